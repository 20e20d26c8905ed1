//! Shared numeric constants for the canvas crate.

// ── Logical canvas ──────────────────────────────────────────────

/// Width of the logical canvas space, independent of on-screen size.
pub const CANVAS_WIDTH: f64 = 2048.0;

/// Height of the logical canvas space (2:1 aspect).
pub const CANVAS_HEIGHT: f64 = 1024.0;

/// Backing-store size of the canvas element, matching the logical space.
pub const CANVAS_WIDTH_PX: u32 = 2048;
pub const CANVAS_HEIGHT_PX: u32 = 1024;

// ── Hit-testing ─────────────────────────────────────────────────

/// Grab radius for objects that declare no width/height.
pub const HIT_RADIUS: f64 = 20.0;

// ── Gestures ────────────────────────────────────────────────────

/// Damping applied to the sampled pointer velocity on release.
pub const THROW_DAMPING: f64 = 0.3;

// ── Rendering ───────────────────────────────────────────────────

/// Radius of the circle drawn for objects without a sprite.
pub const FALLBACK_RADIUS: f64 = 20.0;

/// Radius of the marker drawn at each snapshot anchor.
pub const ANCHOR_RADIUS: f64 = 4.0;

/// Canvas background fill.
pub const BACKGROUND_FILL: &str = "#1F1A17";

/// Fill for the fallback circle.
pub const FALLBACK_FILL: &str = "#D94B4B";

/// Fill for anchor markers.
pub const ANCHOR_FILL: &str = "#8A8178";
