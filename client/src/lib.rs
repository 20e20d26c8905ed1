//! Browser host for the canvas synchronization core.
//!
//! SYSTEM CONTEXT
//! ==============
//! `canvas` holds the state machines; this crate plugs them into the page.
//! It finds the canvas element, opens the lobby socket, forwards pointer
//! events, drives the animation-frame render loop, and decodes sprites. The
//! browser-only parts sit behind the `hydrate` feature. Configuration and
//! frame translation are plain Rust and tested natively.
//!
//! ERROR HANDLING
//! ==============
//! Startup failures are fatal for the page: they raise a blocking alert and
//! are returned to the host. Everything after startup (transport, decode,
//! sprite, draw errors) is logged and survived.

pub mod config;
pub mod input;
pub mod net;

#[cfg(feature = "hydrate")]
pub mod app;
#[cfg(feature = "hydrate")]
pub mod render_loop;

/// Reasons the client cannot start.
#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("invalid client configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("no lobby id was provided")]
    MissingLobby,
    #[error("browser window is not available")]
    MissingWindow,
    #[error("canvas element `{0}` not found")]
    MissingCanvas(String),
    #[error("2D rendering context is not available")]
    MissingContext,
    #[error("could not open socket to {url}: {reason}")]
    Socket { url: String, reason: String },
    #[error("could not attach {event} listener")]
    Listener { event: &'static str },
}

/// Entry point called by the page with a JSON configuration string.
///
/// # Errors
///
/// Returns the startup failure (already shown to the user via `alert`).
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn start(config_json: &str) -> Result<(), wasm_bindgen::JsValue> {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&format!("logger already installed: {e}").into());
    }

    match app::App::start(config_json) {
        Ok(app) => {
            app.keep_alive();
            Ok(())
        }
        Err(e) => {
            log::error!("startup failed: {e}");
            if let Some(window) = web_sys::window() {
                if window.alert_with_message(&e.to_string()).is_err() {
                    log::warn!("could not show startup alert");
                }
            }
            Err(wasm_bindgen::JsValue::from_str(&e.to_string()))
        }
    }
}
