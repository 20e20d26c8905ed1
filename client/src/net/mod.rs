//! Networking for the lobby socket.
//!
//! `frame_client` owns the websocket lifecycle and translates between
//! protobuf frames and engine events.

pub mod frame_client;
