//! Typed message contract carried inside [`Frame`] envelopes.
//!
//! Client intents and server pushes are modelled as two tagged unions so the
//! dispatch code on either side is an exhaustive `match` rather than string
//! comparison. The syscall table lives here and nowhere else.

#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{Frame, Status};

pub const SYSCALL_SESSION_CONNECTED: &str = "session:connected";
pub const SYSCALL_LOBBY_JOIN: &str = "lobby:join";
pub const SYSCALL_LOBBY_LEAVE: &str = "lobby:leave";
pub const SYSCALL_CURSOR_MOVE: &str = "cursor:move";
pub const SYSCALL_CURSOR_MOVED: &str = "cursor:moved";
pub const SYSCALL_CURSOR_CLEAR: &str = "cursor:clear";
pub const SYSCALL_DRAG_START: &str = "object:drag:start";
pub const SYSCALL_DRAG_MOVE: &str = "object:drag:move";
pub const SYSCALL_DRAG_END: &str = "object:drag:end";
pub const SYSCALL_WORLD_SNAPSHOT: &str = "world:snapshot";

/// Error raised when a known syscall carries a payload that does not match the contract.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A required payload field is absent or has the wrong JSON type.
    #[error("{syscall}: missing field `{field}`")]
    MissingField { syscall: String, field: &'static str },
    /// The payload could not be deserialized into the expected shape.
    #[error("{syscall}: invalid payload: {source}")]
    InvalidPayload {
        syscall: String,
        #[source]
        source: serde_json::Error,
    },
    /// The server answered a request with an error frame.
    #[error("{syscall} rejected: {message}")]
    Rejected { syscall: String, message: String },
}

/// A point in logical canvas units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Authoritative pose of one rigid body as pushed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectState {
    /// Stable, unique object identifier.
    pub id: String,
    /// Center x in logical canvas units.
    pub x: f64,
    /// Center y in logical canvas units.
    pub y: f64,
    /// Rotation in radians.
    #[serde(default)]
    pub angle: f64,
    /// Declared width; objects without a size are treated as discs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Declared height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Sprite reference resolved by the asset host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<String>,
}

impl ObjectState {
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Declared `(width, height)`, only when both are present.
    #[must_use]
    pub fn size(&self) -> Option<(f64, f64)> {
        self.width.zip(self.height)
    }
}

/// Intents sent from a client to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    Join { lobby_id: String },
    Move(Point),
    DragStart { id: String, at: Point },
    DragMove(Point),
    DragEnd { velocity: Option<Point> },
    Leave,
}

impl ClientMessage {
    #[must_use]
    pub fn syscall(&self) -> &'static str {
        match self {
            Self::Join { .. } => SYSCALL_LOBBY_JOIN,
            Self::Move(_) => SYSCALL_CURSOR_MOVE,
            Self::DragStart { .. } => SYSCALL_DRAG_START,
            Self::DragMove(_) => SYSCALL_DRAG_MOVE,
            Self::DragEnd { .. } => SYSCALL_DRAG_END,
            Self::Leave => SYSCALL_LOBBY_LEAVE,
        }
    }

    /// Whether this intent must wait for the join acknowledgment.
    ///
    /// Only the join request itself travels before the session has joined.
    #[must_use]
    pub fn requires_join(&self) -> bool {
        !matches!(self, Self::Join { .. })
    }

    /// Wrap the intent in a request frame.
    #[must_use]
    pub fn into_frame(self, lobby_id: Option<&str>, ts: i64) -> Frame {
        let syscall = self.syscall();
        let lobby_id = match &self {
            Self::Join { lobby_id } => Some(lobby_id.clone()),
            _ => lobby_id.map(str::to_owned),
        };
        let data = match self {
            Self::Join { lobby_id } => json!({ "lobby_id": lobby_id }),
            Self::Move(p) | Self::DragMove(p) => json!({ "x": p.x, "y": p.y }),
            Self::DragStart { id, at } => json!({ "id": id, "x": at.x, "y": at.y }),
            Self::DragEnd { velocity: Some(v) } => json!({ "vx": v.x, "vy": v.y }),
            Self::DragEnd { velocity: None } | Self::Leave => json!({}),
        };
        Frame::request(syscall, lobby_id.as_deref(), ts, data)
    }
}

/// Pushes and acknowledgments sent from the server to a client.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// Transport-level greeting carrying the identity assigned to this connection.
    SessionConnected { client_id: String },
    Joined,
    Snapshot { objects: Vec<ObjectState>, anchors: Vec<Point> },
    PresenceMoved { id: String, at: Point },
    PresenceRemoved { id: String },
}

#[derive(Deserialize)]
struct SnapshotPayload {
    objects: Vec<ObjectState>,
    #[serde(default)]
    anchors: Vec<Point>,
}

impl ServerMessage {
    /// Interpret an inbound frame.
    ///
    /// Returns `Ok(None)` for syscalls outside the contract so callers can
    /// ignore them.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] when a known syscall carries a malformed
    /// payload or when the server rejects the join request.
    pub fn from_frame(frame: &Frame) -> Result<Option<Self>, ProtocolError> {
        let syscall = frame.syscall.as_str();
        let message = match syscall {
            SYSCALL_SESSION_CONNECTED => Self::SessionConnected {
                client_id: str_field(frame, "client_id")?.to_owned(),
            },
            SYSCALL_LOBBY_JOIN => match frame.status {
                Status::Done => Self::Joined,
                Status::Error => {
                    return Err(ProtocolError::Rejected {
                        syscall: frame.syscall.clone(),
                        message: frame
                            .data
                            .get("message")
                            .and_then(Value::as_str)
                            .unwrap_or("join refused")
                            .to_owned(),
                    });
                }
                Status::Request | Status::Item => return Ok(None),
            },
            SYSCALL_WORLD_SNAPSHOT => {
                let payload = serde_json::from_value::<SnapshotPayload>(frame.data.clone())
                    .map_err(|source| ProtocolError::InvalidPayload { syscall: frame.syscall.clone(), source })?;
                Self::Snapshot { objects: payload.objects, anchors: payload.anchors }
            }
            SYSCALL_CURSOR_MOVED => Self::PresenceMoved {
                id: str_field(frame, "client_id")?.to_owned(),
                at: Point::new(num_field(frame, "x")?, num_field(frame, "y")?),
            },
            SYSCALL_CURSOR_CLEAR => Self::PresenceRemoved { id: str_field(frame, "client_id")?.to_owned() },
            _ => return Ok(None),
        };
        Ok(Some(message))
    }

    /// Wrap the message in a server-side frame.
    #[must_use]
    pub fn into_frame(self, ts: i64) -> Frame {
        let (syscall, status, data) = match self {
            Self::SessionConnected { client_id } => {
                (SYSCALL_SESSION_CONNECTED, Status::Done, json!({ "client_id": client_id }))
            }
            Self::Joined => (SYSCALL_LOBBY_JOIN, Status::Done, json!({})),
            Self::Snapshot { objects, anchors } => (
                SYSCALL_WORLD_SNAPSHOT,
                Status::Item,
                json!({ "objects": objects, "anchors": anchors }),
            ),
            Self::PresenceMoved { id, at } => {
                (SYSCALL_CURSOR_MOVED, Status::Item, json!({ "client_id": id, "x": at.x, "y": at.y }))
            }
            Self::PresenceRemoved { id } => (SYSCALL_CURSOR_CLEAR, Status::Item, json!({ "client_id": id })),
        };
        Frame::push(syscall, status, ts, data)
    }
}

fn str_field<'a>(frame: &'a Frame, field: &'static str) -> Result<&'a str, ProtocolError> {
    frame
        .data
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| ProtocolError::MissingField { syscall: frame.syscall.clone(), field })
}

fn num_field(frame: &Frame, field: &'static str) -> Result<f64, ProtocolError> {
    frame
        .data
        .get(field)
        .and_then(Value::as_f64)
        .ok_or_else(|| ProtocolError::MissingField { syscall: frame.syscall.clone(), field })
}
