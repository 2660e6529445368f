//! Local mirror of a room, fed by the snapshot and the live event stream.

use std::collections::BTreeMap;

use kokuban_server::{
    domain::{ChunkAssembler, Point, StrokeChunkEvent, WhiteboardClearedEvent},
    infrastructure::dto::{event::EventEnvelope, http::WhiteboardStateResponse},
};

/// 1 件のイベントを適用した結果
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent {
    /// 全チャンクが揃って Stroke が完成した
    StrokeCompleted {
        stroke_id: String,
        token: String,
        color: String,
        width: f64,
        points: Vec<Point>,
    },
    /// チャンクを受け取ったが、まだ揃っていない
    ChunkBuffered {
        stroke_id: String,
        chunk_index: usize,
        total_chunks: usize,
    },
    /// `stroke.end`
    StrokeEnded { stroke_id: Option<String> },
    /// `whiteboard.cleared`
    Cleared { token: String },
    /// `drawing.updated`（レガシーの中継）
    Drawing(serde_json::Value),
    /// 解釈できなかったイベント
    Unrecognized { event: String, reason: String },
}

/// Room の Stroke の写し
#[derive(Debug, Default)]
pub struct RoomMirror {
    /// strokeId → 点列
    strokes: BTreeMap<String, Vec<Point>>,
    assembler: ChunkAssembler<Point>,
}

impl RoomMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// スナップショットで置き換える（再接続のたびに呼ぶ）
    pub fn load_snapshot(&mut self, snapshot: &WhiteboardStateResponse) {
        self.strokes = snapshot
            .0
            .iter()
            .map(|(id, stroke)| (id.clone(), stroke.points.clone()))
            .collect();
        self.assembler.clear();
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn points(&self, stroke_id: &str) -> Option<&[Point]> {
        self.strokes.get(stroke_id).map(Vec::as_slice)
    }

    /// 購読で届いたイベントを 1 件適用する
    pub fn apply(&mut self, envelope: EventEnvelope) -> WatchEvent {
        match envelope.event.as_str() {
            "stroke.chunk" => self.apply_chunk(envelope.data),
            "stroke.end" => {
                let chunk = serde_json::from_value::<StrokeChunkEvent>(envelope.data.clone());
                match chunk {
                    // 点が 0 個の Stroke（Room チャンネル）
                    Ok(event) if event.total_chunks == 0 => {
                        self.strokes.insert(event.stroke_id.clone(), Vec::new());
                        WatchEvent::StrokeEnded {
                            stroke_id: Some(event.stroke_id),
                        }
                    }
                    _ => WatchEvent::StrokeEnded {
                        stroke_id: envelope
                            .data
                            .get("strokeId")
                            .and_then(|v| v.as_str())
                            .map(str::to_string),
                    },
                }
            }
            "whiteboard.cleared" => {
                self.strokes.clear();
                self.assembler.clear();
                match serde_json::from_value::<WhiteboardClearedEvent>(envelope.data) {
                    Ok(event) => WatchEvent::Cleared { token: event.token },
                    Err(_) => WatchEvent::Cleared {
                        token: String::new(),
                    },
                }
            }
            "drawing.updated" => WatchEvent::Drawing(envelope.data),
            other => WatchEvent::Unrecognized {
                event: other.to_string(),
                reason: "unknown event".to_string(),
            },
        }
    }

    fn apply_chunk(&mut self, data: serde_json::Value) -> WatchEvent {
        let event: StrokeChunkEvent = match serde_json::from_value(data) {
            Ok(event) => event,
            Err(e) => {
                return WatchEvent::Unrecognized {
                    event: "stroke.chunk".to_string(),
                    reason: e.to_string(),
                };
            }
        };
        let token = event.token.clone();
        let color = event.color.clone();
        let width = event.width;
        let (stroke_id, chunk) = event.into_chunk();
        let (chunk_index, total_chunks) = (chunk.chunk_index, chunk.total_chunks);

        match self.assembler.push(&stroke_id, chunk) {
            Ok(Some(points)) => {
                self.strokes.insert(stroke_id.clone(), points.clone());
                WatchEvent::StrokeCompleted {
                    stroke_id,
                    token,
                    color,
                    width,
                    points,
                }
            }
            Ok(None) => WatchEvent::ChunkBuffered {
                stroke_id,
                chunk_index,
                total_chunks,
            },
            Err(e) => WatchEvent::Unrecognized {
                event: "stroke.chunk".to_string(),
                reason: e.to_string(),
            },
        }
    }
}
