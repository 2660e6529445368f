//! RoomStore の実装
//!
//! - `inmemory`: HashMap + TTL による実装
//! - 将来的に: `redis` など TTL をネイティブに持つストア

pub mod inmemory;

pub use inmemory::{DEFAULT_ROOM_TTL, InMemoryRoomStore};
