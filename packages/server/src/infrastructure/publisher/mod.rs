//! FanoutPublisher の実装
//!
//! - `broadcast`: tokio の broadcast チャンネルを使った実装
//! - 将来的に: `redis` の pub/sub など

pub mod broadcast;

pub use broadcast::{BroadcastFanoutPublisher, Frame, Subscription};
