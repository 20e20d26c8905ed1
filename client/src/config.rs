//! Host-supplied startup configuration.
//!
//! The page passes a JSON object (as a string) to [`crate::start`]. Every
//! field but the socket URL and lobby id has a default, so a minimal host
//! only names those two.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use canvas::engine::EngineConfig;
use canvas::hit::HitFootprint;
use canvas::session::GatePolicy;
use canvas::world::StalePolicy;
use serde::Deserialize;

use crate::StartError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// DOM id of the `<canvas>` element.
    pub canvas_id: String,
    /// WebSocket endpoint, e.g. `wss://host/ws`.
    pub ws_url: String,
    /// Lobby code extracted by the page.
    pub lobby_id: Option<String>,
    /// Prefix joined to sprite references to form image URLs.
    pub sprite_base_url: String,
    /// Sprite key of the remote cursor icon, resolved like any other sprite.
    pub cursor_icon: String,
    /// `"drop"` or `"queue"`.
    pub gate: GatePolicy,
    /// `"retain"` or `"prune"`.
    pub stale: StalePolicy,
    /// `"axis_aligned"` or `"rotated"`.
    pub footprint: HitFootprint,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            canvas_id: "canvas".to_owned(),
            ws_url: String::new(),
            lobby_id: None,
            sprite_base_url: "/sprites/".to_owned(),
            cursor_icon: "cursor.png".to_owned(),
            gate: GatePolicy::default(),
            stale: StalePolicy::default(),
            footprint: HitFootprint::default(),
        }
    }
}

impl ClientConfig {
    /// Parse the host's JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StartError::Config`] when the JSON is malformed.
    pub fn from_json(raw: &str) -> Result<Self, StartError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// The non-empty lobby id.
    ///
    /// # Errors
    ///
    /// Returns [`StartError::MissingLobby`] when no usable id was given.
    pub fn lobby(&self) -> Result<&str, StartError> {
        match self.lobby_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(StartError::MissingLobby),
        }
    }

    /// Engine settings derived from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StartError::MissingLobby`] when no usable id was given.
    pub fn engine_config(&self) -> Result<EngineConfig, StartError> {
        Ok(EngineConfig {
            lobby_id: self.lobby()?.to_owned(),
            gate: self.gate,
            stale: self.stale,
            footprint: self.footprint,
        })
    }

    /// Image URL for a sprite reference.
    ///
    /// Absolute references (`http:`, `https:`, `data:`, or rooted paths) are
    /// used as-is.
    #[must_use]
    pub fn sprite_url(&self, key: &str) -> String {
        let absolute = key.starts_with('/') || ["http:", "https:", "data:"].iter().any(|p| key.starts_with(p));
        if absolute {
            return key.to_owned();
        }
        let base = self.sprite_base_url.trim_end_matches('/');
        format!("{base}/{key}")
    }
}
