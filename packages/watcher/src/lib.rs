//! Read-only room watcher for the Kokuban whiteboard server.
//!
//! Subscribes to a room, prints the current snapshot, then follows live
//! events, reassembling chunked strokes as they arrive.

mod error;
mod formatter;
mod mirror;
mod runner;
mod session;

pub use error::ClientError;
pub use mirror::{RoomMirror, WatchEvent};
pub use runner::run_watcher;
