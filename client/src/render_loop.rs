//! `requestAnimationFrame` render loop and sprite decoding.
//!
//! Each frame draws the engine's current state. Draw errors are logged and
//! the loop keeps going; it stops only when [`RenderLoop::stop`] is called on
//! teardown. Sprite keys the engine reports as unseen are decoded through
//! `HtmlImageElement`; a finished decode triggers one extra draw so the
//! sprite appears without waiting for the next frame.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use canvas::engine::Engine;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::HtmlImageElement;

use crate::config::ClientConfig;

type FrameCallback = Closure<dyn FnMut(f64)>;

struct Shared {
    engine: Rc<RefCell<Engine>>,
    config: Rc<ClientConfig>,
    window: web_sys::Window,
    /// Id of the pending animation frame, if any.
    handle: Cell<Option<i32>>,
    stopped: Cell<bool>,
    callback: RefCell<Option<FrameCallback>>,
}

/// Handle to a running render loop.
#[derive(Clone)]
pub struct RenderLoop {
    shared: Rc<Shared>,
}

impl RenderLoop {
    /// Draw once and schedule the loop.
    #[must_use]
    pub fn start(window: web_sys::Window, engine: Rc<RefCell<Engine>>, config: Rc<ClientConfig>) -> Self {
        let shared = Rc::new(Shared {
            engine,
            config,
            window,
            handle: Cell::new(None),
            stopped: Cell::new(false),
            callback: RefCell::new(None),
        });

        let weak = Rc::downgrade(&shared);
        let callback: FrameCallback = Closure::new(move |_ts: f64| {
            if let Some(shared) = weak.upgrade() {
                shared.handle.set(None);
                draw(&shared);
                schedule(&shared);
            }
        });
        *shared.callback.borrow_mut() = Some(callback);

        draw(&shared);
        schedule(&shared);
        Self { shared }
    }

    /// Cancel the pending frame and stop rescheduling.
    pub fn stop(&self) {
        self.shared.stopped.set(true);
        if let Some(id) = self.shared.handle.take() {
            if self.shared.window.cancel_animation_frame(id).is_err() {
                log::warn!("could not cancel animation frame {id}");
            }
        }
        self.shared.callback.borrow_mut().take();
        log::info!("render loop stopped");
    }
}

fn schedule(shared: &Rc<Shared>) {
    if shared.stopped.get() || shared.handle.get().is_some() {
        return;
    }
    let callback = shared.callback.borrow();
    let Some(cb) = callback.as_ref() else {
        return;
    };
    match shared.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
        Ok(id) => shared.handle.set(Some(id)),
        Err(e) => log::warn!("requestAnimationFrame failed: {e:?}"),
    }
}

fn draw(shared: &Rc<Shared>) {
    let result = shared.engine.borrow_mut().render();
    match result {
        Ok(loads) => {
            for key in loads {
                load_sprite(shared, key);
            }
        }
        Err(e) => log::warn!("render failed: {e:?}"),
    }
}

fn load_sprite(shared: &Rc<Shared>, key: String) {
    let img = match HtmlImageElement::new() {
        Ok(img) => img,
        Err(e) => {
            log::warn!("could not create image for {key}: {e:?}");
            shared.engine.borrow_mut().fail_sprite(&key);
            return;
        }
    };

    let key = Rc::new(key);
    let on_load = {
        let weak = Rc::downgrade(shared);
        let key = Rc::clone(&key);
        let img = img.clone();
        Closure::once_into_js(move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            log::debug!("sprite {key} decoded");
            shared.engine.borrow_mut().complete_sprite(&key, img);
            if !shared.stopped.get() {
                draw(&shared);
            }
        })
    };
    let on_error = {
        let weak = Rc::downgrade(shared);
        let key = Rc::clone(&key);
        Closure::once_into_js(move || {
            if let Some(shared) = weak.upgrade() {
                shared.engine.borrow_mut().fail_sprite(&key);
            }
        })
    };

    img.set_onload(Some(on_load.unchecked_ref()));
    img.set_onerror(Some(on_error.unchecked_ref()));
    img.set_src(&shared.config.sprite_url(&key));
}
