//! Data Transfer Objects (DTOs) for the whiteboard.
//!
//! DTOs are organized by protocol:
//! - `http`: HTTP API request / response DTOs
//! - `event`: the envelope every subscriber frame is wrapped in

pub mod conversion;
pub mod event;
pub mod http;
