use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use frames::{ClientMessage, ServerMessage};

use crate::consts::{CANVAS_HEIGHT_PX, CANVAS_WIDTH_PX};
use crate::hit::HitFootprint;
use crate::input::{DragController, PointerPhase};
use crate::presence::PresenceTracker;
use crate::render::{self, Scene, SpriteCache};
use crate::session::{ConnectionGateway, GatePolicy};
use crate::viewport::{Point, ViewRect};
use crate::world::{StalePolicy, WorldStateCache};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Per-session settings for the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub lobby_id: String,
    pub gate: GatePolicy,
    pub stale: StalePolicy,
    pub footprint: HitFootprint,
}

/// Everything the engine reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A pointer event in viewport coordinates, with the canvas element's
    /// bounding box at the time of the event.
    Pointer { phase: PointerPhase, client: Point, bounds: ViewRect, ts_ms: f64 },
    /// The transport is up and the server assigned this identity.
    Connected { client_id: String },
    Server(ServerMessage),
    /// The server refused the join request.
    JoinRejected(String),
    TransportError(String),
    Disconnected,
    /// The page is going away.
    Teardown,
}

/// Core engine state: every piece of logic that needs no canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub world: WorldStateCache,
    pub presence: PresenceTracker,
    pub drag: DragController,
    pub gateway: ConnectionGateway,
    rng: StdRng,
}

impl EngineCore {
    /// Build a core for `config`. `seed` drives hue selection.
    #[must_use]
    pub fn new(config: EngineConfig, seed: u64) -> Self {
        Self {
            world: WorldStateCache::new(config.stale),
            presence: PresenceTracker::new(),
            drag: DragController::new(config.footprint),
            gateway: ConnectionGateway::new(config.lobby_id, config.gate),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Dispatch one event. Returns the intents cleared for transmission,
    /// in send order.
    pub fn handle(&mut self, event: Event) -> Vec<ClientMessage> {
        match event {
            Event::Pointer { phase, client, bounds, ts_ms } => {
                let pt = bounds.to_canvas(client);
                self.on_pointer(phase, pt, ts_ms)
            }
            Event::Connected { client_id } => self.on_connected(&client_id),
            Event::Server(msg) => self.on_server(msg),
            Event::JoinRejected(reason) => {
                self.gateway.on_rejected(&reason);
                Vec::new()
            }
            Event::TransportError(detail) => {
                self.gateway.on_transport_error(&detail);
                Vec::new()
            }
            Event::Disconnected => {
                self.gateway.on_disconnected();
                Vec::new()
            }
            Event::Teardown => self.gateway.leave().into_iter().collect(),
        }
    }

    fn on_connected(&mut self, client_id: &str) -> Vec<ClientMessage> {
        self.presence.set_local_id(client_id);
        self.gateway.on_connected(client_id, &mut self.rng)
    }

    fn on_pointer(&mut self, phase: PointerPhase, pt: Point, ts_ms: f64) -> Vec<ClientMessage> {
        let intents: Vec<ClientMessage> = match phase {
            PointerPhase::Down => self.drag.pointer_down(pt, ts_ms, &self.world).into_iter().collect(),
            PointerPhase::Move => {
                let mut out = vec![ClientMessage::Move(pt)];
                out.extend(self.drag.pointer_move(pt, ts_ms));
                out
            }
            PointerPhase::Up => self.drag.pointer_up().into_iter().collect(),
        };
        intents.into_iter().filter_map(|m| self.gateway.submit(m)).collect()
    }

    fn on_server(&mut self, msg: ServerMessage) -> Vec<ClientMessage> {
        match msg {
            ServerMessage::SessionConnected { client_id } => self.on_connected(&client_id),
            ServerMessage::Joined => self.gateway.on_joined(),
            ServerMessage::Snapshot { objects, anchors } => {
                self.world.apply(objects, anchors);
                Vec::new()
            }
            ServerMessage::PresenceMoved { id, at } => {
                self.presence.upsert(&id, at, &mut self.rng);
                Vec::new()
            }
            ServerMessage::PresenceRemoved { id } => {
                self.presence.remove(&id);
                Vec::new()
            }
        }
    }

    /// Draw list for the current state.
    #[must_use]
    pub fn scene<T>(&self, sprites: &SpriteCache<T>, cursor_key: &str) -> Scene {
        render::plan(&self.world, &self.presence, sprites, cursor_key)
    }

    /// The lobby this core joins.
    #[must_use]
    pub fn lobby_id(&self) -> &str {
        self.gateway.lobby_id()
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
    pub sprites: SpriteCache<HtmlImageElement>,
    cursor_key: String,
}

impl Engine {
    /// Bind to a canvas element and size its backing store to the logical canvas.
    #[must_use]
    pub fn new(
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        config: EngineConfig,
        seed: u64,
        cursor_key: impl Into<String>,
    ) -> Self {
        canvas.set_width(CANVAS_WIDTH_PX);
        canvas.set_height(CANVAS_HEIGHT_PX);
        Self {
            canvas,
            ctx,
            core: EngineCore::new(config, seed),
            sprites: SpriteCache::new(),
            cursor_key: cursor_key.into(),
        }
    }

    pub fn handle(&mut self, event: Event) -> Vec<ClientMessage> {
        self.core.handle(event)
    }

    /// Current on-screen bounding box of the canvas element.
    #[must_use]
    pub fn bounds(&self) -> ViewRect {
        let rect = self.canvas.get_bounding_client_rect();
        ViewRect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    /// Draw the current state to the canvas.
    ///
    /// Returns the sprite keys whose loads should start now; each is already
    /// marked loading in [`Engine::sprites`].
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    pub fn render(&mut self) -> Result<Vec<String>, JsValue> {
        let scene = self.core.scene(&self.sprites, &self.cursor_key);
        render::draw(&self.ctx, &scene, &self.sprites, &self.cursor_key)?;
        Ok(scene.loads.into_iter().filter(|key| self.sprites.request(key)).collect())
    }

    pub fn complete_sprite(&mut self, key: &str, img: HtmlImageElement) {
        self.sprites.complete(key, img);
    }

    pub fn fail_sprite(&mut self, key: &str) {
        self.sprites.fail(key);
    }
}
