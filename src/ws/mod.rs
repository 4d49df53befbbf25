//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams tile updates to clients that
//! subscribe to tile ids (or `"*"` for all tiles).

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
