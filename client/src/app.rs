//! Startup: locate the page resources and wire the engine to them.

use std::cell::RefCell;
use std::rc::Rc;

use canvas::engine::Engine;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::StartError;
use crate::config::ClientConfig;
use crate::input::{self, Listeners};
use crate::net::frame_client::{FrameSender, spawn_frame_client};
use crate::render_loop::RenderLoop;

/// A running client. Dropping it detaches listeners and stops the loop.
pub struct App {
    _engine: Rc<RefCell<Engine>>,
    _tx: FrameSender,
    _listeners: Listeners,
    render_loop: RenderLoop,
}

impl Drop for App {
    fn drop(&mut self) {
        self.render_loop.stop();
    }
}

impl App {
    /// Parse configuration and bring every piece up.
    ///
    /// # Errors
    ///
    /// Returns the first [`StartError`] hit; nothing is retried.
    pub fn start(config_json: &str) -> Result<Self, StartError> {
        let config = Rc::new(ClientConfig::from_json(config_json)?);
        let engine_config = config.engine_config()?;

        let window = web_sys::window().ok_or(StartError::MissingWindow)?;
        let document = window.document().ok_or(StartError::MissingWindow)?;
        let canvas = document
            .get_element_by_id(&config.canvas_id)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or_else(|| StartError::MissingCanvas(config.canvas_id.clone()))?;
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| StartError::MissingContext)?
            .and_then(|obj| obj.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(StartError::MissingContext)?;

        log::info!("starting client for lobby {}", engine_config.lobby_id);
        let engine = Rc::new(RefCell::new(Engine::new(
            canvas.clone(),
            ctx,
            engine_config,
            hue_seed(),
            config.cursor_icon.clone(),
        )));

        let tx = spawn_frame_client(&config.ws_url, Rc::clone(&engine))?;
        let render_loop = RenderLoop::start(window.clone(), Rc::clone(&engine), Rc::clone(&config));

        let teardown_loop = render_loop.clone();
        let listeners = input::attach(&window, &canvas, &engine, &tx, move || teardown_loop.stop())?;

        Ok(Self { _engine: engine, _tx: tx, _listeners: listeners, render_loop })
    }

    /// Hand the running client to the page for the rest of its lifetime.
    pub fn keep_alive(self) {
        std::mem::forget(self);
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn hue_seed() -> u64 {
    (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64
}
