#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use frames::{ObjectState, Point};

use crate::consts::HIT_RADIUS;
use crate::world::WorldStateCache;

/// Which region a sized object is grabbed by.
///
/// Objects are always drawn rotated. `AxisAligned` tests the un-rotated
/// box around the center, so the grabbable footprint differs from the drawn
/// one whenever `angle != 0`. `Rotated` maps the point into object-local
/// space first so both agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum HitFootprint {
    #[default]
    AxisAligned,
    Rotated,
}

/// Whether `pt` falls inside `obj`.
#[must_use]
pub fn contains(obj: &ObjectState, pt: Point, footprint: HitFootprint) -> bool {
    let offset = pt - obj.center();
    match obj.size() {
        Some((w, h)) => {
            let local = match footprint {
                HitFootprint::AxisAligned => offset,
                HitFootprint::Rotated => rotate(offset, -obj.angle),
            };
            local.x.abs() <= w / 2.0 && local.y.abs() <= h / 2.0
        }
        None => offset.x * offset.x + offset.y * offset.y <= HIT_RADIUS * HIT_RADIUS,
    }
}

/// First object in iteration order that contains `pt`.
#[must_use]
pub fn hit_test<'a>(pt: Point, world: &'a WorldStateCache, footprint: HitFootprint) -> Option<&'a ObjectState> {
    world.all().find(|obj| contains(obj, pt, footprint))
}

fn rotate(p: Point, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    Point::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos)
}
