//! Remote cursor presence.
//!
//! Each remote participant gets a hue the first time they are seen. The hue
//! sticks until the server says the participant is gone; a participant that
//! comes back afterwards is a new arrival and draws a fresh hue.

#[cfg(test)]
#[path = "presence_test.rs"]
mod presence_test;

use std::collections::BTreeMap;

use frames::Point;
use rand::Rng;

/// Latest known state of one remote pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemoteCursor {
    pub position: Point,
    /// Degrees in `[0, 360)`.
    pub hue: f64,
}

/// Draw a hue uniformly from `[0, 360)`.
pub fn random_hue(rng: &mut impl Rng) -> f64 {
    rng.random_range(0.0..360.0)
}

#[derive(Debug, Default)]
pub struct PresenceTracker {
    cursors: BTreeMap<String, RemoteCursor>,
    local_id: Option<String>,
}

impl PresenceTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this client's own identity so its echoes are ignored.
    ///
    /// A stale entry under the new id is dropped.
    pub fn set_local_id(&mut self, id: &str) {
        self.cursors.remove(id);
        self.local_id = Some(id.to_owned());
    }

    #[must_use]
    pub fn local_id(&self) -> Option<&str> {
        self.local_id.as_deref()
    }

    /// Update a participant's position. Returns `false` for the local id.
    pub fn upsert(&mut self, id: &str, position: Point, rng: &mut impl Rng) -> bool {
        if self.local_id.as_deref() == Some(id) {
            return false;
        }
        match self.cursors.get_mut(id) {
            Some(cursor) => cursor.position = position,
            None => {
                let hue = random_hue(rng);
                log::debug!("presence: {id} arrived with hue {hue:.0}");
                self.cursors.insert(id.to_owned(), RemoteCursor { position, hue });
            }
        }
        true
    }

    /// Forget a participant, hue included.
    pub fn remove(&mut self, id: &str) -> Option<RemoteCursor> {
        self.cursors.remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RemoteCursor> {
        self.cursors.get(id)
    }

    /// Remote cursors in id order.
    pub fn cursors(&self) -> impl Iterator<Item = (&str, &RemoteCursor)> {
        self.cursors.iter().map(|(id, c)| (id.as_str(), c))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }
}
