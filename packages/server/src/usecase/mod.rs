//! UseCase layer.
//!
//! Durable operations (`SaveStrokeUseCase`, `ClearWhiteboardUseCase`) go
//! through the RoomStore before anything is published. The ephemeral
//! pass-through (`BroadcastEphemeralUseCase`) only publishes and never
//! touches the store. `GetWhiteboardStateUseCase` is the read path used by
//! clients joining mid-session.

mod broadcast_ephemeral;
mod clear_whiteboard;
mod error;
mod get_whiteboard_state;
mod save_stroke;

#[cfg(test)]
mod test_support;

pub use broadcast_ephemeral::{BroadcastEphemeralUseCase, EphemeralPayload};
pub use clear_whiteboard::{ClearWhiteboardCommand, ClearWhiteboardUseCase};
pub use error::{
    BroadcastEphemeralError, ClearWhiteboardError, GetWhiteboardStateError, SaveStrokeError,
};
pub use get_whiteboard_state::GetWhiteboardStateUseCase;
pub use save_stroke::{SaveStrokeCommand, SaveStrokeOutcome, SaveStrokeUseCase};
