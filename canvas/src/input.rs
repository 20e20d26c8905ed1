//! Input model: pointer phases, the drag session, and the gesture state machine.
//!
//! `DragController` turns pointer-down / move / up on the logical canvas into
//! drag intents for the server. It never moves objects itself: the intents
//! carry the pointer position and the server decides where bodies go. On
//! release the damped pointer velocity is sent along so the server can
//! impart a throw.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use frames::{ClientMessage, Point};

use crate::consts::THROW_DAMPING;
use crate::hit::{self, HitFootprint};
use crate::velocity::VelocitySampler;
use crate::world::WorldStateCache;

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// The local record of an in-progress grab.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Id of the grabbed object.
    pub target: String,
    /// Pointer minus object center at grab time.
    pub grab_offset: Point,
    /// Canvas position of the most recent accepted velocity sample.
    pub last_pointer: Point,
    /// Timestamp of the most recent accepted velocity sample, in milliseconds.
    pub last_ts_ms: f64,
}

/// Gesture state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// An object is held.
    Dragging(DragSession),
}

/// Grab → move → release/throw state machine.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
    sampler: VelocitySampler,
    footprint: HitFootprint,
}

impl DragController {
    #[must_use]
    pub fn new(footprint: HitFootprint) -> Self {
        Self { footprint, ..Self::default() }
    }

    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session().is_some()
    }

    /// Pointer pressed at canvas point `pt`.
    ///
    /// A hit opens (or replaces) the session and yields `DragStart`. A miss
    /// while a session is still open means the local and remote views have
    /// diverged; the session is closed with a velocity-less `DragEnd`.
    pub fn pointer_down(&mut self, pt: Point, ts_ms: f64, world: &WorldStateCache) -> Option<ClientMessage> {
        let Some(obj) = hit::hit_test(pt, world, self.footprint) else {
            let DragState::Dragging(stale) = std::mem::take(&mut self.state) else {
                return None;
            };
            log::warn!("pointer-down missed while still holding {}; ending drag", stale.target);
            self.sampler.reset();
            return Some(ClientMessage::DragEnd { velocity: None });
        };

        let session = DragSession {
            target: obj.id.clone(),
            grab_offset: pt - obj.center(),
            last_pointer: pt,
            last_ts_ms: ts_ms,
        };
        log::debug!("grab {} at ({:.1}, {:.1})", session.target, pt.x, pt.y);
        self.sampler.reset();
        self.sampler.push(pt, ts_ms);
        let message = ClientMessage::DragStart { id: session.target.clone(), at: pt };
        self.state = DragState::Dragging(session);
        Some(message)
    }

    /// Pointer moved to `pt`. Only produces an intent while dragging.
    pub fn pointer_move(&mut self, pt: Point, ts_ms: f64) -> Option<ClientMessage> {
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };
        if self.sampler.push(pt, ts_ms) {
            session.last_pointer = pt;
            session.last_ts_ms = ts_ms;
        }
        Some(ClientMessage::DragMove(pt))
    }

    /// Pointer released. Ends the session with the damped throw velocity.
    pub fn pointer_up(&mut self) -> Option<ClientMessage> {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        let velocity = self.sampler.velocity() * THROW_DAMPING;
        self.sampler.reset();
        log::debug!("release {} with velocity ({:.1}, {:.1})", session.target, velocity.x, velocity.y);
        Some(ClientMessage::DragEnd { velocity: Some(velocity) })
    }

    /// Current (undamped) pointer velocity estimate.
    #[must_use]
    pub fn velocity(&self) -> Point {
        self.sampler.velocity()
    }
}
