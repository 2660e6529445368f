//! Fan-out event payloads produced by the whiteboard itself.
//!
//! These travel as the `data` field of every frame a subscriber receives.

use serde::{Deserialize, Serialize};

use super::{
    chunker::StrokeChunk,
    entity::Stroke,
    value_object::{ClientToken, Point, RoomPass},
};

/// `stroke.chunk` (and `stroke.end` for a stroke without points)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeChunkEvent {
    pub stroke_id: String,
    pub token: String,
    pub points: Vec<Point>,
    pub color: String,
    pub width: f64,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

impl StrokeChunkEvent {
    /// Build the payload for one chunk of `stroke`.
    pub fn from_chunk(stroke: &Stroke, chunk: StrokeChunk) -> Self {
        Self {
            stroke_id: stroke.id.as_str().to_string(),
            token: stroke.token.as_str().to_string(),
            points: chunk.points,
            color: stroke.color.as_str().to_string(),
            width: stroke.width.value(),
            chunk_index: chunk.chunk_index,
            total_chunks: chunk.total_chunks,
        }
    }

    /// Split the event back into the chunk it carries.
    pub fn into_chunk(self) -> (String, StrokeChunk) {
        (
            self.stroke_id,
            StrokeChunk {
                chunk_index: self.chunk_index,
                total_chunks: self.total_chunks,
                points: self.points,
            },
        )
    }
}

/// `whiteboard.cleared`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhiteboardClearedEvent {
    pub pass: String,
    pub token: String,
}

impl WhiteboardClearedEvent {
    pub fn new(pass: &RoomPass, token: &ClientToken) -> Self {
        Self {
            pass: pass.as_str().to_string(),
            token: token.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::test_support::stroke;
    use serde_json::json;

    #[test]
    fn test_chunk_event_carries_stroke_metadata() {
        // テスト項目: チャンクのペイロードに Stroke の属性と index / total が入る
        // given (前提条件):
        let stroke = stroke("s1", &[(0.0, 0.0), (1.0, 1.0)]);
        let chunk = StrokeChunk {
            chunk_index: 1,
            total_chunks: 3,
            points: vec![Point::new(1.0, 1.0)],
        };

        // when (操作):
        let event = StrokeChunkEvent::from_chunk(&stroke, chunk);
        let json = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            json!({
                "strokeId": "s1",
                "token": "tok1",
                "points": [[1.0, 1.0]],
                "color": "red",
                "width": 2.0,
                "chunkIndex": 1,
                "totalChunks": 3
            })
        );
        let (stroke_id, chunk) = event.into_chunk();
        assert_eq!(stroke_id, "s1");
        assert_eq!(chunk.chunk_index, 1);
        assert_eq!(chunk.points, vec![Point::new(1.0, 1.0)]);
    }

    #[test]
    fn test_cleared_event_names_room_and_requester() {
        // テスト項目: whiteboard.cleared のペイロードは pass と token を持つ
        // given (前提条件):
        let pass = RoomPass::new("roomA".to_string()).unwrap();
        let token = ClientToken::new("tok2".to_string()).unwrap();

        // when (操作):
        let json = serde_json::to_value(WhiteboardClearedEvent::new(&pass, &token)).unwrap();

        // then (期待する結果):
        assert_eq!(json, json!({"pass": "roomA", "token": "tok2"}));
    }
}
