//! Connection lifecycle and outbound gating.
//!
//! The gateway owns the [`ConnectionSession`] and decides which intents may
//! reach the socket. Until the server acknowledges the join, everything but
//! the join itself is held back according to [`GatePolicy`].

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::VecDeque;

use frames::ClientMessage;
use rand::Rng;

use crate::presence::random_hue;

/// Upper bound on intents held while waiting for the join acknowledgment.
pub const MAX_PENDING: usize = 256;

/// Treatment of gated intents sent before the join is acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum GatePolicy {
    /// Discard them.
    #[default]
    Drop,
    /// Buffer them and flush in order once joined.
    #[cfg_attr(feature = "serde", serde(rename = "queue", alias = "queue_until_joined"))]
    QueueUntilJoined,
}

/// Per-connection state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionSession {
    pub joined: bool,
    /// Identity assigned by the server on connect.
    pub local_id: Option<String>,
    /// Hue drawn for this client on connect.
    pub local_hue: Option<f64>,
}

#[derive(Debug, Default)]
pub struct ConnectionGateway {
    lobby_id: String,
    policy: GatePolicy,
    session: ConnectionSession,
    pending: VecDeque<ClientMessage>,
}

impl ConnectionGateway {
    #[must_use]
    pub fn new(lobby_id: impl Into<String>, policy: GatePolicy) -> Self {
        Self { lobby_id: lobby_id.into(), policy, ..Self::default() }
    }

    #[must_use]
    pub fn session(&self) -> &ConnectionSession {
        &self.session
    }

    #[must_use]
    pub fn lobby_id(&self) -> &str {
        &self.lobby_id
    }

    #[must_use]
    pub fn is_joined(&self) -> bool {
        self.session.joined
    }

    /// Number of intents waiting for the join acknowledgment.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Transport connected and the server assigned `client_id`.
    ///
    /// Stores identity and a fresh local hue, then yields the join request.
    /// Runs again in full on every connect; the gate closes until the new
    /// join is acknowledged.
    pub fn on_connected(&mut self, client_id: &str, rng: &mut impl Rng) -> Vec<ClientMessage> {
        let hue = random_hue(rng);
        log::info!("connected as {client_id}; joining lobby {}", self.lobby_id);
        self.session.joined = false;
        self.session.local_id = Some(client_id.to_owned());
        self.session.local_hue = Some(hue);
        vec![ClientMessage::Join { lobby_id: self.lobby_id.clone() }]
    }

    /// Join acknowledged. Returns any intents queued while waiting.
    pub fn on_joined(&mut self) -> Vec<ClientMessage> {
        self.session.joined = true;
        log::info!("joined lobby {}", self.lobby_id);
        self.pending.drain(..).collect()
    }

    /// Pass an outbound intent through the gate.
    ///
    /// Returns the message when it may be sent now.
    pub fn submit(&mut self, message: ClientMessage) -> Option<ClientMessage> {
        if self.session.joined || !message.requires_join() {
            return Some(message);
        }
        match self.policy {
            GatePolicy::Drop => {
                log::debug!("dropping {} before join", message.syscall());
            }
            GatePolicy::QueueUntilJoined => self.enqueue(message),
        }
        None
    }

    /// Buffer a gated intent. A `Move` or `DragMove` replaces one of the same
    /// kind at the tail. Past [`MAX_PENDING`] new intents are dropped.
    fn enqueue(&mut self, message: ClientMessage) {
        let coalesces = matches!(
            (self.pending.back(), &message),
            (Some(ClientMessage::Move(_)), ClientMessage::Move(_))
                | (Some(ClientMessage::DragMove(_)), ClientMessage::DragMove(_))
        );
        if coalesces {
            self.pending.pop_back();
        } else if self.pending.len() >= MAX_PENDING {
            log::warn!("pending queue full; dropping {} before join", message.syscall());
            return;
        }
        log::debug!("queueing {} until joined", message.syscall());
        self.pending.push_back(message);
    }

    /// Produce the gated `leave` intent.
    pub fn leave(&mut self) -> Option<ClientMessage> {
        self.submit(ClientMessage::Leave)
    }

    /// The server refused the join request.
    pub fn on_rejected(&mut self, reason: &str) {
        log::warn!("join to lobby {} rejected: {reason}", self.lobby_id);
    }

    pub fn on_transport_error(&mut self, detail: &str) {
        log::warn!("transport error in lobby {}: {detail}", self.lobby_id);
    }

    /// Transport closed. Session state is left as-is.
    pub fn on_disconnected(&mut self) {
        log::info!("transport disconnected from lobby {}", self.lobby_id);
    }
}
