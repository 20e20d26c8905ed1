//! Shared frame envelope, protobuf codec, and typed message contract for the
//! lobby WebSocket.
//!
//! Every message on the socket is a [`Frame`]: a small envelope carrying a
//! namespaced `syscall`, a lifecycle [`Status`], and a JSON object payload.
//! Frames travel as protobuf bytes. The [`message`] module layers the typed
//! [`ClientMessage`] / [`ServerMessage`] unions on top of the envelope so the
//! rest of the workspace never matches on raw syscall strings.

pub mod message;
mod payload;

pub use message::{ClientMessage, ObjectState, Point, ProtocolError, ServerMessage};

use prost::Message;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to decode protobuf frame: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("unknown frame status {0}")]
    InvalidStatus(i32),
    #[error("frame payload is not an object")]
    PayloadNotObject,
}

/// Where a frame sits in a request's lifecycle.
///
/// Clients only ever send `Request`. The server answers a request with
/// `Done` or `Error` and pushes world and presence updates as `Item`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Request,
    Item,
    Done,
    Error,
}

impl From<Status> for i32 {
    fn from(status: Status) -> Self {
        let wire = match status {
            Status::Request => WireStatus::Request,
            Status::Done => WireStatus::Done,
            Status::Error => WireStatus::Error,
            Status::Item => WireStatus::Item,
        };
        wire as i32
    }
}

impl TryFrom<i32> for Status {
    type Error = CodecError;

    fn try_from(raw: i32) -> Result<Self, CodecError> {
        match WireStatus::try_from(raw) {
            Ok(WireStatus::Request) => Ok(Status::Request),
            Ok(WireStatus::Done) => Ok(Status::Done),
            Ok(WireStatus::Error) => Ok(Status::Error),
            Ok(WireStatus::Item) => Ok(Status::Item),
            Err(_) => Err(CodecError::InvalidStatus(raw)),
        }
    }
}

/// A single message on the lobby socket.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub id: String,
    /// Request this frame answers, when the server correlates replies.
    pub parent_id: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub ts: i64,
    pub lobby_id: Option<String>,
    /// Sender label stamped by the server.
    pub from: Option<String>,
    /// e.g. `"object:drag:start"`.
    pub syscall: String,
    pub status: Status,
    pub data: Value,
}

impl Frame {
    /// A client intent with a fresh id.
    #[must_use]
    pub fn request(syscall: &str, lobby_id: Option<&str>, ts: i64, data: Value) -> Self {
        Self { lobby_id: lobby_id.map(str::to_owned), ..Self::push(syscall, Status::Request, ts, data) }
    }

    /// A server-originated frame with a fresh id and no lobby or sender.
    #[must_use]
    pub fn push(syscall: &str, status: Status, ts: i64, data: Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            parent_id: None,
            ts,
            lobby_id: None,
            from: None,
            syscall: syscall.to_owned(),
            status,
            data,
        }
    }
}

/// Encode a frame into protobuf bytes.
#[must_use]
pub fn encode_frame(frame: &Frame) -> Vec<u8> {
    <Envelope as From<&Frame>>::from(frame).encode_to_vec()
}

/// Decode protobuf bytes into a frame.
///
/// # Errors
///
/// [`CodecError::Decode`] for malformed bytes, [`CodecError::InvalidStatus`]
/// for an unknown status, and [`CodecError::PayloadNotObject`] when the
/// payload is a bare scalar or list.
pub fn decode_frame(bytes: &[u8]) -> Result<Frame, CodecError> {
    Frame::try_from(Envelope::decode(bytes)?)
}

impl From<&Frame> for Envelope {
    fn from(frame: &Frame) -> Self {
        Self {
            id: frame.id.clone(),
            parent_id: frame.parent_id.clone(),
            ts: frame.ts,
            lobby_id: frame.lobby_id.clone(),
            from: frame.from.clone(),
            syscall: frame.syscall.clone(),
            status: frame.status.into(),
            data: Some(payload::encode(&frame.data)),
        }
    }
}

impl TryFrom<Envelope> for Frame {
    type Error = CodecError;

    fn try_from(env: Envelope) -> Result<Self, CodecError> {
        Ok(Self {
            status: Status::try_from(env.status)?,
            data: payload::decode(env.data)?,
            id: env.id,
            parent_id: env.parent_id,
            ts: env.ts,
            lobby_id: env.lobby_id,
            from: env.from,
            syscall: env.syscall,
        })
    }
}

/// Protobuf layout of a frame. Field tags are shared with the server.
#[derive(Clone, PartialEq, Message)]
struct Envelope {
    #[prost(string, tag = "1")]
    id: String,
    #[prost(string, optional, tag = "2")]
    parent_id: Option<String>,
    #[prost(int64, tag = "3")]
    ts: i64,
    #[prost(string, optional, tag = "4")]
    lobby_id: Option<String>,
    #[prost(string, optional, tag = "5")]
    from: Option<String>,
    #[prost(string, tag = "6")]
    syscall: String,
    #[prost(enumeration = "WireStatus", tag = "7")]
    status: i32,
    #[prost(message, optional, tag = "8")]
    data: Option<prost_types::Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, prost::Enumeration)]
#[repr(i32)]
enum WireStatus {
    Request = 0,
    Done = 1,
    Error = 2,
    Item = 3,
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
