//! Domain layer for the whiteboard.
//!
//! Value objects, entities and the two seams the rest of the application
//! depends on: [`RoomStore`] (durable state) and [`FanoutPublisher`]
//! (live delivery). Concrete implementations live in the infrastructure layer.

pub mod chunker;
pub mod entity;
pub mod error;
pub mod event;
pub mod publisher;
pub mod repository;
pub mod value_object;

pub use chunker::{ChunkAssembler, DEFAULT_CHUNK_SIZE, StrokeChunk, StrokeReassembler, split};
pub use entity::{RoomState, Stroke};
pub use error::{PublishError, ReassemblyError, StoreError, ValidationErrors, ValueObjectError};
pub use event::{StrokeChunkEvent, WhiteboardClearedEvent};
pub use publisher::{Channel, EventName, FanoutPublisher};
pub use repository::RoomStore;
pub use value_object::{
    ChunkSize, ClientToken, Color, Point, PointInput, RoomPass, StrokeId, StrokeWidth, Timestamp,
};
