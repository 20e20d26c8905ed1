//! DOM pointer wiring.
//!
//! Pointer-down is listened for on the canvas; move and up on the window so
//! a drag that leaves the element still tracks and still releases. Every
//! event is stamped with `Event.timeStamp` (milliseconds) and the canvas
//! element's current bounding box, then dispatched to the engine.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use canvas::input::PointerPhase;

/// DOM event types this module listens for, with their phases.
pub const POINTER_EVENTS: [(&str, PointerPhase); 4] = [
    ("pointerdown", PointerPhase::Down),
    ("pointermove", PointerPhase::Move),
    ("pointerup", PointerPhase::Up),
    ("pointercancel", PointerPhase::Up),
];

/// Map a DOM event type to a pointer phase.
#[must_use]
pub fn pointer_phase(event_type: &str) -> Option<PointerPhase> {
    POINTER_EVENTS.iter().find(|(name, _)| *name == event_type).map(|(_, phase)| *phase)
}

/// Whether a pointer event should be handled at all.
///
/// Only the primary pointer drives gestures; secondary mouse buttons are
/// ignored on press.
#[must_use]
pub fn accepts(phase: PointerPhase, is_primary: bool, button: i16) -> bool {
    is_primary && (phase != PointerPhase::Down || button == 0)
}

#[cfg(feature = "hydrate")]
pub use self::dom::{Listeners, attach};

#[cfg(feature = "hydrate")]
mod dom {
    use std::cell::RefCell;
    use std::rc::Rc;

    use canvas::engine::{Engine, Event};
    use canvas::input::PointerPhase;
    use canvas::viewport::Point;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;
    use web_sys::{EventTarget, PointerEvent};

    use super::{POINTER_EVENTS, accepts};
    use crate::StartError;
    use crate::net::frame_client::{FrameSender, dispatch};

    type Handler = Closure<dyn FnMut(web_sys::Event)>;

    /// Registered listeners. Dropping this detaches them.
    pub struct Listeners {
        attached: Vec<(EventTarget, &'static str, Handler)>,
    }

    impl Drop for Listeners {
        fn drop(&mut self) {
            for (target, name, handler) in &self.attached {
                if target.remove_event_listener_with_callback(name, handler.as_ref().unchecked_ref()).is_err() {
                    log::warn!("could not detach {name} listener");
                }
            }
        }
    }

    /// Attach pointer and teardown listeners.
    ///
    /// `on_teardown` runs after the engine has produced its leave intent.
    ///
    /// # Errors
    ///
    /// Returns [`StartError::Listener`] if the browser refuses a listener.
    pub fn attach(
        window: &web_sys::Window,
        canvas: &web_sys::HtmlCanvasElement,
        engine: &Rc<RefCell<Engine>>,
        tx: &FrameSender,
        on_teardown: impl Fn() + 'static,
    ) -> Result<Listeners, StartError> {
        let mut listeners = Listeners { attached: Vec::new() };

        for (name, phase) in POINTER_EVENTS {
            let target: EventTarget = if phase == PointerPhase::Down {
                canvas.clone().unchecked_into()
            } else {
                window.clone().unchecked_into()
            };
            let engine = Rc::clone(engine);
            let tx = tx.clone();
            let handler: Handler = Closure::new(move |ev: web_sys::Event| {
                let Some(ev) = ev.dyn_ref::<PointerEvent>() else {
                    return;
                };
                if !accepts(phase, ev.is_primary(), ev.button()) {
                    return;
                }
                let bounds = engine.borrow().bounds();
                let client = Point::new(f64::from(ev.client_x()), f64::from(ev.client_y()));
                let event = Event::Pointer { phase, client, bounds, ts_ms: ev.time_stamp() };
                dispatch(&engine, &tx, event);
            });
            listen(&mut listeners, target, name, handler)?;
        }

        let engine = Rc::clone(engine);
        let tx = tx.clone();
        let handler: Handler = Closure::new(move |_: web_sys::Event| {
            dispatch(&engine, &tx, Event::Teardown);
            on_teardown();
        });
        listen(&mut listeners, window.clone().unchecked_into(), "pagehide", handler)?;

        Ok(listeners)
    }

    fn listen(
        listeners: &mut Listeners,
        target: EventTarget,
        name: &'static str,
        handler: Handler,
    ) -> Result<(), StartError> {
        target
            .add_event_listener_with_callback(name, handler.as_ref().unchecked_ref())
            .map_err(|_| StartError::Listener { event: name })?;
        listeners.attached.push((target, name, handler));
        Ok(())
    }
}
