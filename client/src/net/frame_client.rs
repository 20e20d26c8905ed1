//! WebSocket frame client for the lobby connection.
//!
//! Inbound bytes are decoded into [`Frame`]s, interpreted as
//! [`ServerMessage`]s and handed to the engine as [`Event`]s. The intents the
//! engine returns are encoded and queued on an unbounded channel that a
//! writer task drains into the socket.
//!
//! The translation functions are plain Rust. The socket tasks are gated
//! behind `#[cfg(feature = "hydrate")]` since they require a browser.
//!
//! ERROR HANDLING
//! ==============
//! Undecodable bytes and malformed payloads are logged and skipped. A
//! rejected join becomes [`Event::JoinRejected`]. Transport errors and
//! closure become [`Event::TransportError`] / [`Event::Disconnected`]; there
//! is no reconnect loop.

#[cfg(test)]
#[path = "frame_client_test.rs"]
mod frame_client_test;

use canvas::engine::Event;
use frames::{ClientMessage, Frame, ProtocolError, ServerMessage};

/// Encode an outbound intent as protobuf bytes.
#[must_use]
pub fn encode_message(message: ClientMessage, lobby_id: &str, ts: i64) -> Vec<u8> {
    frames::encode_frame(&message.into_frame(Some(lobby_id), ts))
}

/// Interpret a decoded frame as an engine event.
///
/// Returns `None` for frames outside the message contract and for
/// malformed payloads, which are logged.
#[must_use]
pub fn frame_event(frame: &Frame) -> Option<Event> {
    match ServerMessage::from_frame(frame) {
        Ok(Some(message)) => Some(Event::Server(message)),
        Ok(None) => {
            log::debug!("ignoring frame {}", frame.syscall);
            None
        }
        Err(ProtocolError::Rejected { message, .. }) => Some(Event::JoinRejected(message)),
        Err(e) => {
            log::warn!("dropping malformed frame: {e}");
            None
        }
    }
}

/// Decode raw socket bytes into an engine event.
#[must_use]
pub fn decode_event(bytes: &[u8]) -> Option<Event> {
    match frames::decode_frame(bytes) {
        Ok(frame) => frame_event(&frame),
        Err(e) => {
            log::warn!("dropping undecodable frame: {e}");
            None
        }
    }
}

#[cfg(feature = "hydrate")]
pub use self::socket::{FrameSender, send_messages, spawn_frame_client};

#[cfg(feature = "hydrate")]
mod socket {
    use std::cell::RefCell;
    use std::rc::Rc;

    use canvas::engine::{Engine, Event};
    use frames::ClientMessage;
    use futures::channel::mpsc;

    use super::{decode_event, encode_message};
    use crate::StartError;

    pub type FrameSender = mpsc::UnboundedSender<Vec<u8>>;

    #[allow(clippy::cast_possible_truncation)]
    fn now_ms() -> i64 {
        js_sys::Date::now() as i64
    }

    /// Queue intents for the writer task, in order.
    ///
    /// Returns `false` if the channel is closed (no active connection).
    pub fn send_messages(tx: &FrameSender, lobby_id: &str, messages: Vec<ClientMessage>) -> bool {
        let ts = now_ms();
        for message in messages {
            log::debug!("send {}", message.syscall());
            if tx.unbounded_send(encode_message(message, lobby_id, ts)).is_err() {
                log::warn!("socket writer is gone; dropping outbound intents");
                return false;
            }
        }
        true
    }

    /// Open the socket and spawn its reader and writer as a local task.
    ///
    /// # Errors
    ///
    /// Returns [`StartError::Socket`] when the socket cannot be opened.
    pub fn spawn_frame_client(url: &str, engine: Rc<RefCell<Engine>>) -> Result<FrameSender, StartError> {
        use gloo_net::websocket::futures::WebSocket;

        let ws = WebSocket::open(url).map_err(|e| StartError::Socket { url: url.to_owned(), reason: e.to_string() })?;
        let (tx, rx) = mpsc::unbounded::<Vec<u8>>();
        log::info!("socket opening to {url}");
        wasm_bindgen_futures::spawn_local(run(ws, engine, tx.clone(), rx));
        Ok(tx)
    }

    async fn run(
        ws: gloo_net::websocket::futures::WebSocket,
        engine: Rc<RefCell<Engine>>,
        tx: FrameSender,
        mut rx: mpsc::UnboundedReceiver<Vec<u8>>,
    ) {
        use futures::{SinkExt, StreamExt};
        use gloo_net::websocket::Message;

        let (mut ws_write, mut ws_read) = ws.split();

        let send_task = async {
            while let Some(bytes) = rx.next().await {
                if let Err(e) = ws_write.send(Message::Bytes(bytes)).await {
                    dispatch(&engine, &tx, Event::TransportError(e.to_string()));
                    break;
                }
            }
        };

        let recv_task = async {
            while let Some(msg) = ws_read.next().await {
                match msg {
                    Ok(Message::Bytes(bytes)) => {
                        if let Some(event) = decode_event(&bytes) {
                            dispatch(&engine, &tx, event);
                        }
                    }
                    Ok(Message::Text(text)) => log::debug!("ignoring text message ({} bytes)", text.len()),
                    Err(e) => {
                        dispatch(&engine, &tx, Event::TransportError(e.to_string()));
                        break;
                    }
                }
            }
        };

        // When either half finishes the connection is done.
        futures::future::select(Box::pin(send_task), Box::pin(recv_task)).await;
        dispatch(&engine, &tx, Event::Disconnected);
    }

    /// Feed one event to the engine and ship whatever it emits.
    pub(crate) fn dispatch(engine: &Rc<RefCell<Engine>>, tx: &FrameSender, event: Event) {
        let (lobby_id, out) = {
            let mut engine = engine.borrow_mut();
            let out = engine.handle(event);
            (engine.core.lobby_id().to_owned(), out)
        };
        if !out.is_empty() {
            send_messages(tx, &lobby_id, out);
        }
    }
}

#[cfg(feature = "hydrate")]
pub(crate) use self::socket::dispatch;
