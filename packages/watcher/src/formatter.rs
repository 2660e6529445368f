//! Event formatting utilities for watcher display.

use kokuban_server::infrastructure::dto::http::WhiteboardStateResponse;
use kokuban_shared::time::timestamp_to_jst_rfc3339;

use crate::mirror::WatchEvent;

const RULE: &str = "============================================================";

/// Event formatter for watcher display
pub struct EventFormatter;

impl EventFormatter {
    /// Format the snapshot fetched right after subscribing
    ///
    /// # Arguments
    ///
    /// * `pass` - The room being watched
    /// * `snapshot` - Finished strokes keyed by stroke id
    pub fn format_snapshot(pass: &str, snapshot: &WhiteboardStateResponse) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{RULE}\n"));
        output.push_str(&format!("Room '{}': {} stroke(s)\n", pass, snapshot.0.len()));

        if snapshot.0.is_empty() {
            output.push_str("(Empty whiteboard)\n");
        } else {
            for (stroke_id, stroke) in &snapshot.0 {
                let saved_at = timestamp_to_jst_rfc3339(stroke.timestamp)
                    .unwrap_or_else(|| stroke.timestamp.to_string());
                output.push_str(&format!(
                    "{} by {} - {} point(s), {} / {} - saved at {}\n",
                    stroke_id,
                    stroke.token,
                    stroke.points.len(),
                    stroke.color,
                    stroke.width,
                    saved_at
                ));
            }
        }

        output.push_str(&format!("{RULE}\n"));
        output
    }

    /// Format one applied live event
    ///
    /// Returns `None` for events not worth a line of output (buffered chunks).
    pub fn format_event(event: &WatchEvent) -> Option<String> {
        match event {
            WatchEvent::StrokeCompleted {
                stroke_id,
                token,
                color,
                width,
                points,
            } => Some(format!(
                "+ {} by {} - {} point(s), {} / {}\n",
                stroke_id,
                token,
                points.len(),
                color,
                width
            )),
            WatchEvent::ChunkBuffered { .. } => None,
            WatchEvent::StrokeEnded {
                stroke_id: Some(stroke_id),
            } => Some(format!(". {} ended\n", stroke_id)),
            WatchEvent::StrokeEnded { stroke_id: None } => Some(". stroke ended\n".to_string()),
            WatchEvent::Cleared { token } if token.is_empty() => {
                Some("x whiteboard cleared\n".to_string())
            }
            WatchEvent::Cleared { token } => Some(format!("x whiteboard cleared by {}\n", token)),
            WatchEvent::Drawing(payload) => Some(format!("~ drawing {}\n", payload)),
            WatchEvent::Unrecognized { event, reason } => {
                Some(format!("? {} ({})\n", event, reason))
            }
        }
    }

    /// Format a raw text frame (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("← Received: {}\n", text)
    }
}
