//! インメモリ実装

mod room;

pub use room::{DEFAULT_ROOM_TTL, InMemoryRoomStore};
