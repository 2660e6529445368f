//! UseCase テスト用の FanoutPublisher テストダブル

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{
    domain::{Channel, EventName, FanoutPublisher, PublishError, RoomPass, RoomStore},
    infrastructure::repository::InMemoryRoomStore,
};

/// publish された内容
#[derive(Debug, Clone, PartialEq)]
pub struct Published {
    pub channel: String,
    pub event: EventName,
    pub payload: serde_json::Value,
}

/// publish を記録するだけの FanoutPublisher
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<Published>>,
}

impl RecordingPublisher {
    pub fn published(&self) -> Vec<Published> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl FanoutPublisher for RecordingPublisher {
    async fn publish(
        &self,
        channel: &Channel,
        event: EventName,
        payload: serde_json::Value,
    ) -> Result<(), PublishError> {
        self.published.lock().unwrap().push(Published {
            channel: channel.name(),
            event,
            payload,
        });
        Ok(())
    }
}

/// 常に失敗する FanoutPublisher（呼ばれた回数だけ数える）
#[derive(Debug, Default)]
pub struct FailingPublisher {
    attempts: Mutex<usize>,
}

impl FailingPublisher {
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl FanoutPublisher for FailingPublisher {
    async fn publish(
        &self,
        _channel: &Channel,
        _event: EventName,
        _payload: serde_json::Value,
    ) -> Result<(), PublishError> {
        *self.attempts.lock().unwrap() += 1;
        Err(PublishError::Unavailable("broker down".to_string()))
    }
}

/// publish された瞬間のストアの状態を記録する FanoutPublisher
///
/// 「ストアを更新してから publish する」順序の検証に使う。
pub struct StoreProbingPublisher {
    store: Arc<InMemoryRoomStore>,
    pass: RoomPass,
    strokes_seen: Mutex<Vec<usize>>,
}

impl StoreProbingPublisher {
    pub fn new(store: Arc<InMemoryRoomStore>, pass: RoomPass) -> Self {
        Self {
            store,
            pass,
            strokes_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn strokes_seen(&self) -> Vec<usize> {
        self.strokes_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl FanoutPublisher for StoreProbingPublisher {
    async fn publish(
        &self,
        _channel: &Channel,
        _event: EventName,
        _payload: serde_json::Value,
    ) -> Result<(), PublishError> {
        let len = self
            .store
            .get(&self.pass)
            .await
            .map(|state| state.len())
            .map_err(|e| PublishError::Unavailable(e.to_string()))?;
        self.strokes_seen.lock().unwrap().push(len);
        Ok(())
    }
}
