//! Request handlers.

mod http;
mod websocket;

pub use http::{
    broadcast_drawing, broadcast_stroke_end, clear_whiteboard, get_whiteboard, health_check,
    save_stroke,
};
pub use websocket::websocket_handler;
