//! Client-side synchronization core for a shared physics canvas.
//!
//! This crate is compiled to WebAssembly and runs in the browser, but almost
//! all of it is plain Rust that also runs natively. It captures pointer input
//! in logical canvas space, turns it into drag and throw intents, mirrors the
//! server's authoritative snapshots, and tracks remote cursors. The server
//! owns every pose; nothing here simulates physics. The host layer wires DOM
//! events and the socket to [`engine::Engine`] and ships the returned
//! [`frames::ClientMessage`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] event dispatch |
//! | [`viewport`] | Viewport → logical canvas coordinate mapping |
//! | [`hit`] | Hit-testing against cached objects |
//! | [`velocity`] | Pointer velocity estimation |
//! | [`input`] | Pointer phases and the drag/throw state machine |
//! | [`session`] | Connection lifecycle and outbound gating |
//! | [`world`] | Cache of the latest authoritative snapshot |
//! | [`presence`] | Remote cursors and their hues |
//! | [`render`] | Scene planning, sprite cache, and 2D drawing |
//! | [`consts`] | Shared numeric constants (canvas size, radii, damping) |

pub mod consts;
pub mod engine;
pub mod hit;
pub mod input;
pub mod presence;
pub mod render;
pub mod session;
pub mod velocity;
pub mod viewport;
pub mod world;
