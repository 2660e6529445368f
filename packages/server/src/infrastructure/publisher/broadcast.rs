//! tokio の broadcast チャンネルを使った FanoutPublisher 実装
//!
//! ## 責務
//!
//! - チャンネル名（`whiteboard.{pass}` / `whiteboard`）ごとに `broadcast::Sender` を管理
//! - publish されたイベントを JSON の封筒に包んで全購読者に配信
//!
//! ## 設計ノート
//!
//! WebSocket 接続の受付は UI 層（`ui/handler/websocket.rs`）で行われます。
//! UI 層は `subscribe` で受信側を受け取り、フレームをそのままソケットへ流します。
//!
//! - 購読者がいないチャンネルへの publish は何もせずに成功する
//! - `broadcast::Sender::send` は購読者を待たないので、遅い購読者が
//!   書き込み側を止めることはない（遅れた購読者は `Lagged` を受け取る）

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::{Mutex, broadcast};

use crate::domain::{Channel, EventName, FanoutPublisher, PublishError};

/// 購読者が受け取るフレーム（シリアライズ済みの JSON）
pub type Frame = Arc<str>;

/// 購読者側の受信口
pub type Subscription = broadcast::Receiver<Frame>;

/// 購読者に届く JSON の封筒
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    channel: &'a str,
    event: &'a str,
    data: &'a serde_json::Value,
}

/// broadcast チャンネルを使った FanoutPublisher 実装
pub struct BroadcastFanoutPublisher {
    /// Key: チャンネル名
    channels: Mutex<HashMap<String, broadcast::Sender<Frame>>>,
    /// 購読者ごとのバッファ長。これを超えて遅れた購読者は古いイベントを失う
    capacity: usize,
}

impl BroadcastFanoutPublisher {
    pub const DEFAULT_CAPACITY: usize = 256;

    /// 新しい BroadcastFanoutPublisher を作成（`capacity` は 1 以上に切り上げる）
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// `channel` を購読する
    ///
    /// 受信口が drop されたまま `release` されなかったチャンネルもここで片付ける。
    pub async fn subscribe(&self, channel: &Channel) -> Subscription {
        let name = channel.name();
        let mut channels = self.channels.lock().await;
        channels.retain(|_, sender| sender.receiver_count() > 0);
        let sender = channels
            .entry(name.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        let receiver = sender.subscribe();
        tracing::debug!(
            "Subscribed to '{}' ({} subscriber(s))",
            name,
            sender.receiver_count()
        );
        receiver
    }

    /// 購読者が居なくなったチャンネルを片付ける
    ///
    /// 購読を終えた側（受信口を drop した後）が呼ぶ。
    pub async fn release(&self, channel: &Channel) {
        let name = channel.name();
        let mut channels = self.channels.lock().await;
        if channels
            .get(&name)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            channels.remove(&name);
            tracing::debug!("Channel '{}' has no subscribers left, removed", name);
        }
    }

    /// `channel` の現在の購読者数
    pub async fn subscriber_count(&self, channel: &Channel) -> usize {
        let channels = self.channels.lock().await;
        channels
            .get(&channel.name())
            .map_or(0, broadcast::Sender::receiver_count)
    }

    /// 購読者が 1 人以上いるチャンネルの数
    pub async fn active_channels(&self) -> usize {
        let channels = self.channels.lock().await;
        channels
            .values()
            .filter(|sender| sender.receiver_count() > 0)
            .count()
    }
}

impl Default for BroadcastFanoutPublisher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl FanoutPublisher for BroadcastFanoutPublisher {
    async fn publish(
        &self,
        channel: &Channel,
        event: EventName,
        payload: serde_json::Value,
    ) -> Result<(), PublishError> {
        let name = channel.name();
        let frame: Frame = serde_json::to_string(&Envelope {
            channel: &name,
            event: event.as_str(),
            data: &payload,
        })
        .map_err(|e| PublishError::Encode(e.to_string()))?
        .into();

        let mut channels = self.channels.lock().await;
        let Some(sender) = channels.get(&name) else {
            tracing::debug!("No subscribers on '{}', dropping '{}'", name, event);
            return Ok(());
        };

        match sender.send(frame) {
            Ok(delivered) => {
                tracing::debug!("Published '{}' on '{}' to {} subscriber(s)", event, name, delivered);
            }
            Err(_) => {
                // 全ての受信口が drop 済み
                channels.remove(&name);
                tracing::debug!("No subscribers on '{}', dropping '{}'", name, event);
            }
        }
        Ok(())
    }
}
