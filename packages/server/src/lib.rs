//! Kokuban whiteboard server library.
//!
//! Completed strokes are persisted per room and fanned out to subscribers in
//! bounded-size chunks; clients joining mid-session fetch a snapshot of the
//! room instead of replaying the stream.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
