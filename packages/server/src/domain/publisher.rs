//! FanoutPublisher trait 定義
//!
//! 「Room の購読者全員にイベントを配信する」ためのインターフェース。
//! 配信はベストエフォート（接続ごとに高々 1 回）で、publish 時点で
//! 接続していない購読者には届かない。取りこぼしたクライアントは
//! RoomStore のスナップショットから状態を復元する。
//!
//! 実装は RoomStore に触れてはならない。

use std::fmt;

use async_trait::async_trait;

use super::{error::PublishError, value_object::RoomPass};

/// 配信先チャンネル
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Room 単位のチャンネル `whiteboard.{pass}`
    Room(RoomPass),
    /// Room に紐づかない旧来のチャンネル `whiteboard`
    Legacy,
}

impl Channel {
    pub const LEGACY_NAME: &'static str = "whiteboard";

    pub fn name(&self) -> String {
        match self {
            Channel::Room(pass) => format!("{}.{}", Self::LEGACY_NAME, pass.as_str()),
            Channel::Legacy => Self::LEGACY_NAME.to_string(),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// 配信イベント名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    StrokeChunk,
    StrokeEnd,
    WhiteboardCleared,
    DrawingUpdated,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::StrokeChunk => "stroke.chunk",
            EventName::StrokeEnd => "stroke.end",
            EventName::WhiteboardCleared => "whiteboard.cleared",
            EventName::DrawingUpdated => "drawing.updated",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// FanoutPublisher trait
///
/// UseCase 層はこの trait にのみ依存し、配信手段（WebSocket, 外部 pub/sub など）
/// の具体的な実装には依存しない。
#[async_trait]
pub trait FanoutPublisher: Send + Sync {
    /// `channel` の現在の購読者全員に `event` を配信する
    ///
    /// 購読者がいない場合も成功とする。遅い購読者を待ってはならない。
    async fn publish(
        &self,
        channel: &Channel,
        event: EventName,
        payload: serde_json::Value,
    ) -> Result<(), PublishError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names() {
        // テスト項目: Room チャンネルは whiteboard.{pass}、旧来チャンネルは whiteboard
        // given (前提条件):
        let room = Channel::Room(RoomPass::new("roomA".to_string()).unwrap());

        // when (操作):
        let room_name = room.name();
        let legacy_name = Channel::Legacy.to_string();

        // then (期待する結果):
        assert_eq!(room_name, "whiteboard.roomA");
        assert_eq!(legacy_name, "whiteboard");
    }

    #[test]
    fn test_event_names() {
        // テスト項目: イベント名がワイヤ上の名前と一致する
        // given (前提条件):
        let events = [
            (EventName::StrokeChunk, "stroke.chunk"),
            (EventName::StrokeEnd, "stroke.end"),
            (EventName::WhiteboardCleared, "whiteboard.cleared"),
            (EventName::DrawingUpdated, "drawing.updated"),
        ];

        for (event, expected) in events {
            // when (操作):
            let name = event.to_string();

            // then (期待する結果):
            assert_eq!(name, expected);
        }
    }
}
