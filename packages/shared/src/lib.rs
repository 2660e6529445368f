//! Utilities shared by the Kokuban server and watcher.

pub mod logger;
pub mod time;
