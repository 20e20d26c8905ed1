//! World model: the client's cache of the latest authoritative snapshot.
//!
//! The server owns every pose. This cache only mirrors what the last
//! snapshot said, keeps a stable iteration order for hit-testing and draw
//! order, and decides what happens to ids a newer snapshot no longer lists.

#[cfg(test)]
#[path = "world_test.rs"]
mod world_test;

use std::collections::HashMap;

use frames::{ObjectState, Point};

/// What to do with cached ids that are missing from a newer snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum StalePolicy {
    /// Keep the last known state for absent ids.
    #[default]
    Retain,
    /// Drop absent ids so the cache mirrors the snapshot exactly.
    Prune,
}

/// In-memory store of object states, owned by the engine.
#[derive(Debug, Default)]
pub struct WorldStateCache {
    objects: HashMap<String, ObjectState>,
    /// First-seen order of ids; drives hit-test priority and draw order.
    order: Vec<String>,
    anchors: Vec<Point>,
    policy: StalePolicy,
}

impl WorldStateCache {
    #[must_use]
    pub fn new(policy: StalePolicy) -> Self {
        Self { policy, ..Self::default() }
    }

    /// Apply a snapshot. Each listed entry replaces its predecessor wholesale.
    pub fn apply(&mut self, objects: Vec<ObjectState>, anchors: Vec<Point>) {
        if self.policy == StalePolicy::Prune {
            let listed: std::collections::HashSet<&str> = objects.iter().map(|o| o.id.as_str()).collect();
            self.order.retain(|id| listed.contains(id.as_str()));
            self.objects.retain(|id, _| listed.contains(id.as_str()));
        }
        for obj in objects {
            if !self.objects.contains_key(&obj.id) {
                self.order.push(obj.id.clone());
            }
            self.objects.insert(obj.id.clone(), obj);
        }
        self.anchors = anchors;
    }

    /// All known objects in iteration order.
    pub fn all(&self) -> impl Iterator<Item = &ObjectState> {
        self.order.iter().filter_map(|id| self.objects.get(id))
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ObjectState> {
        self.objects.get(id)
    }

    /// Anchor points from the most recent snapshot.
    #[must_use]
    pub fn anchors(&self) -> &[Point] {
        &self.anchors
    }

    #[must_use]
    pub fn policy(&self) -> StalePolicy {
        self.policy
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
