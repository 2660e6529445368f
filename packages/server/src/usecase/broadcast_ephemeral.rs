//! UseCase: 一時的な描画イベントの中継（レガシー経路）
//!
//! `POST /api/drawing` と `POST /api/stroke-end` の受け口。ペイロードは検証も
//! 保存もせずに、グローバルな `whiteboard` チャンネルへそのまま流す。

use std::sync::Arc;

use crate::domain::{Channel, EventName, FanoutPublisher};

use super::error::BroadcastEphemeralError;

/// 中継する JSON オブジェクト
#[derive(Debug, Clone, PartialEq)]
pub struct EphemeralPayload(serde_json::Map<String, serde_json::Value>);

impl EphemeralPayload {
    /// JSON オブジェクト以外（配列、文字列、null など）は受け付けない
    pub fn new(value: serde_json::Value) -> Result<Self, BroadcastEphemeralError> {
        match value {
            serde_json::Value::Object(map) => Ok(Self(map)),
            _ => Err(BroadcastEphemeralError::NotAnObject),
        }
    }

    pub fn into_value(self) -> serde_json::Value {
        serde_json::Value::Object(self.0)
    }
}

/// 一時的な描画イベント中継のユースケース
///
/// RoomStore には一切触れない。
pub struct BroadcastEphemeralUseCase {
    publisher: Arc<dyn FanoutPublisher>,
}

impl BroadcastEphemeralUseCase {
    pub fn new(publisher: Arc<dyn FanoutPublisher>) -> Self {
        Self { publisher }
    }

    /// 描画途中のイベントを `drawing.updated` として中継
    pub async fn broadcast_drawing(&self, payload: EphemeralPayload) {
        self.relay(EventName::DrawingUpdated, payload).await;
    }

    /// Stroke 終了のイベントを `stroke.end` として中継
    pub async fn broadcast_stroke_end(&self, payload: EphemeralPayload) {
        self.relay(EventName::StrokeEnd, payload).await;
    }

    async fn relay(&self, event: EventName, payload: EphemeralPayload) {
        let channel = Channel::Legacy;
        if let Err(e) = self
            .publisher
            .publish(&channel, event, payload.into_value())
            .await
        {
            tracing::warn!("Failed to relay '{}' on '{}': {}", event, channel, e);
        }
    }
}
