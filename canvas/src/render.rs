//! Rendering: turns the world cache and presence into pixels.
//!
//! Drawing is split in two. [`plan`] walks read-only views of
//! [`WorldStateCache`], [`PresenceTracker`] and the [`SpriteCache`] and
//! produces a [`Scene`]: an ordered draw list plus the sprite keys that
//! nobody has started loading yet. [`draw`] executes a scene on a
//! [`CanvasRenderingContext2d`] and is the only place that touches the 2D
//! context. Neither half mutates application state.
//!
//! The context is assumed to be sized to the logical canvas, so scene
//! coordinates are used as-is. All fallible `Canvas2D` calls propagate
//! errors via `Result<(), JsValue>`; the render loop logs and carries on.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::HashMap;
use std::f64::consts::TAU;

use frames::Point;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::consts::{
    ANCHOR_FILL, ANCHOR_RADIUS, BACKGROUND_FILL, CANVAS_HEIGHT, CANVAS_WIDTH, FALLBACK_FILL, FALLBACK_RADIUS,
};
use crate::presence::PresenceTracker;
use crate::world::WorldStateCache;

// =============================================================
// Sprite cache
// =============================================================

/// Load state of one sprite.
#[derive(Debug, Clone, PartialEq)]
pub enum SpriteSlot<T> {
    Loading,
    Ready(T),
    Failed,
}

/// Decoded sprites keyed by sprite reference.
///
/// Generic over the image type so the bookkeeping can be exercised without a
/// browser. Failed loads stay failed until a later successful load for the
/// same key replaces the slot.
#[derive(Debug)]
pub struct SpriteCache<T> {
    slots: HashMap<String, SpriteSlot<T>>,
}

impl<T> Default for SpriteCache<T> {
    fn default() -> Self {
        Self { slots: HashMap::new() }
    }
}

impl<T> SpriteCache<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as loading. Returns `true` only the first time a key is
    /// seen, meaning the caller should start the load.
    pub fn request(&mut self, key: &str) -> bool {
        if self.slots.contains_key(key) {
            return false;
        }
        self.slots.insert(key.to_owned(), SpriteSlot::Loading);
        true
    }

    /// A load finished; the sprite is drawable from now on.
    pub fn complete(&mut self, key: &str, sprite: T) {
        self.slots.insert(key.to_owned(), SpriteSlot::Ready(sprite));
    }

    /// A load failed. The slot is not retried.
    pub fn fail(&mut self, key: &str) {
        log::warn!("sprite {key} failed to load");
        self.slots.insert(key.to_owned(), SpriteSlot::Failed);
    }

    #[must_use]
    pub fn slot(&self, key: &str) -> Option<&SpriteSlot<T>> {
        self.slots.get(key)
    }

    /// The decoded sprite, if ready.
    #[must_use]
    pub fn ready(&self, key: &str) -> Option<&T> {
        match self.slots.get(key) {
            Some(SpriteSlot::Ready(sprite)) => Some(sprite),
            _ => None,
        }
    }
}

// =============================================================
// Scene planning
// =============================================================

/// One draw instruction, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Background,
    Anchor(Point),
    /// A decoded sprite posed at `at` and rotated by `angle`. Drawn at the
    /// declared size when there is one, natural size otherwise.
    Sprite { key: String, at: Point, angle: f64, size: Option<(f64, f64)> },
    /// Placeholder disc for an object that has no sprite reference.
    Fallback { at: Point, angle: f64 },
    /// Remote pointer icon tinted by the participant's hue.
    Cursor { id: String, at: Point, hue: f64 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub ops: Vec<DrawOp>,
    /// Sprite keys referenced by this scene that have no slot yet.
    pub loads: Vec<String>,
}

impl Scene {
    fn want(&mut self, key: &str) {
        if !self.loads.iter().any(|k| k == key) {
            self.loads.push(key.to_owned());
        }
    }
}

/// Build the draw list for the current state.
///
/// Paint order is background, anchors, objects in world iteration order, then
/// remote cursors. An object whose sprite is loading or failed is skipped for
/// the frame; cursors are skipped until `cursor_key` is ready.
#[must_use]
pub fn plan<T>(
    world: &WorldStateCache,
    presence: &PresenceTracker,
    sprites: &SpriteCache<T>,
    cursor_key: &str,
) -> Scene {
    let mut scene = Scene { ops: vec![DrawOp::Background], loads: Vec::new() };

    scene.ops.extend(world.anchors().iter().copied().map(DrawOp::Anchor));

    for obj in world.all() {
        let at = obj.center();
        match obj.sprite.as_deref() {
            None => scene.ops.push(DrawOp::Fallback { at, angle: obj.angle }),
            Some(key) => match sprites.slot(key) {
                Some(SpriteSlot::Ready(_)) => scene.ops.push(DrawOp::Sprite {
                    key: key.to_owned(),
                    at,
                    angle: obj.angle,
                    size: obj.size(),
                }),
                Some(SpriteSlot::Loading | SpriteSlot::Failed) => {}
                None => scene.want(key),
            },
        }
    }

    if presence.is_empty() {
        return scene;
    }
    match sprites.slot(cursor_key) {
        Some(SpriteSlot::Ready(_)) => {
            for (id, cursor) in presence.cursors() {
                scene.ops.push(DrawOp::Cursor { id: id.to_owned(), at: cursor.position, hue: cursor.hue });
            }
        }
        Some(_) => {}
        None => scene.want(cursor_key),
    }
    scene
}

// =============================================================
// Drawing
// =============================================================

/// Paint `scene` onto `ctx`.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    scene: &Scene,
    sprites: &SpriteCache<HtmlImageElement>,
    cursor_key: &str,
) -> Result<(), JsValue> {
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
    for op in &scene.ops {
        match op {
            DrawOp::Background => {
                ctx.set_fill_style_str(BACKGROUND_FILL);
                ctx.fill_rect(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT);
            }
            DrawOp::Anchor(at) => draw_disc(ctx, *at, ANCHOR_RADIUS, ANCHOR_FILL)?,
            DrawOp::Sprite { key, at, angle, size } => {
                if let Some(img) = sprites.ready(key) {
                    draw_sprite(ctx, img, *at, *angle, *size)?;
                }
            }
            DrawOp::Fallback { at, angle } => {
                ctx.save();
                pose(ctx, *at, *angle)?;
                draw_disc(ctx, Point::default(), FALLBACK_RADIUS, FALLBACK_FILL)?;
                ctx.restore();
            }
            DrawOp::Cursor { at, hue, .. } => {
                if let Some(icon) = sprites.ready(cursor_key) {
                    ctx.save();
                    ctx.set_filter(&format!("hue-rotate({hue}deg)"));
                    ctx.draw_image_with_html_image_element(icon, at.x, at.y)?;
                    ctx.restore();
                }
            }
        }
    }
    Ok(())
}

fn draw_sprite(
    ctx: &CanvasRenderingContext2d,
    img: &HtmlImageElement,
    at: Point,
    angle: f64,
    size: Option<(f64, f64)>,
) -> Result<(), JsValue> {
    let (w, h) = size.unwrap_or_else(|| (f64::from(img.natural_width()), f64::from(img.natural_height())));
    ctx.save();
    pose(ctx, at, angle)?;
    ctx.draw_image_with_html_image_element_and_dw_and_dh(img, -w / 2.0, -h / 2.0, w, h)?;
    ctx.restore();
    Ok(())
}

fn draw_disc(ctx: &CanvasRenderingContext2d, at: Point, radius: f64, fill: &str) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.arc(at.x, at.y, radius, 0.0, TAU)?;
    ctx.set_fill_style_str(fill);
    ctx.fill();
    Ok(())
}

fn pose(ctx: &CanvasRenderingContext2d, at: Point, angle: f64) -> Result<(), JsValue> {
    ctx.translate(at.x, at.y)?;
    ctx.rotate(angle)
}
