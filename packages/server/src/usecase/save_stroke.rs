//! UseCase: Stroke 保存処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SaveStrokeUseCase::execute() メソッド
//! - Stroke の永続化（後勝ち）とチャンク単位の配信
//!
//! ### なぜこのテストが必要か
//! - 永続化が配信より優先される：ストアへの書き込みに失敗したら何も配信しない
//! - 配信の失敗は呼び出し元に返さない（状態は正しく、途中参加者はスナップショットで復元できる）
//! - 点列の順序とチャンクのメタデータが正しいことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：Stroke の保存と chunk 配信
//! - 異常系：ストア障害、配信障害
//! - エッジケース：点が 0 個の Stroke、同じ strokeId の再保存

use std::sync::Arc;

use kokuban_shared::time::Clock;

use crate::domain::{
    Channel, ChunkSize, ClientToken, Color, EventName, FanoutPublisher, Point, PublishError,
    RoomPass, RoomStore, Stroke, StrokeChunk, StrokeChunkEvent, StrokeId, StrokeWidth, Timestamp,
    split,
};

use super::error::SaveStrokeError;

/// 検証済みの Stroke 保存コマンド
#[derive(Debug, Clone, PartialEq)]
pub struct SaveStrokeCommand {
    pub pass: RoomPass,
    pub stroke_id: StrokeId,
    pub token: ClientToken,
    pub points: Vec<Point>,
    pub color: Color,
    pub width: StrokeWidth,
}

/// Stroke 保存の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveStrokeOutcome {
    /// 配信しようとしたイベント数（chunk 数、点が無ければ stroke.end の 1）
    pub events: usize,
    /// 配信に失敗したイベント数
    pub failed_publishes: usize,
}

/// Stroke 保存のユースケース
pub struct SaveStrokeUseCase {
    /// RoomStore（データアクセス層の抽象化）
    store: Arc<dyn RoomStore>,
    /// FanoutPublisher（配信の抽象化）
    publisher: Arc<dyn FanoutPublisher>,
    clock: Arc<dyn Clock>,
    chunk_size: ChunkSize,
}

impl SaveStrokeUseCase {
    /// 新しい SaveStrokeUseCase を作成
    pub fn new(
        store: Arc<dyn RoomStore>,
        publisher: Arc<dyn FanoutPublisher>,
        clock: Arc<dyn Clock>,
        chunk_size: ChunkSize,
    ) -> Self {
        Self {
            store,
            publisher,
            clock,
            chunk_size,
        }
    }

    /// Stroke 保存を実行
    ///
    /// 1. サーバー時刻を付与した完成済み Stroke を RoomStore に upsert
    /// 2. 点列をチャンクに分割し、チャンクごとに `stroke.chunk` を配信
    ///    （点が 0 個なら代わりに `stroke.end` を 1 回配信）
    ///
    /// # Returns
    ///
    /// * `Ok(SaveStrokeOutcome)` - ストアへの書き込みに成功（配信の成否は問わない）
    /// * `Err(SaveStrokeError)` - ストアへの書き込みに失敗（何も配信していない）
    pub async fn execute(
        &self,
        command: SaveStrokeCommand,
    ) -> Result<SaveStrokeOutcome, SaveStrokeError> {
        let SaveStrokeCommand {
            pass,
            stroke_id,
            token,
            points,
            color,
            width,
        } = command;

        let timestamp = Timestamp::new(self.clock.now_millis());
        let stroke = Stroke::finished(stroke_id, token, points, color, width, timestamp);

        // チャンクはストアに入らない。配信用のペイロードだけを先に組み立てる
        let chunks = split(&stroke.points, self.chunk_size);
        let (event, payloads): (EventName, Vec<StrokeChunkEvent>) = if chunks.is_empty() {
            (
                EventName::StrokeEnd,
                vec![StrokeChunkEvent::from_chunk(
                    &stroke,
                    StrokeChunk {
                        chunk_index: 0,
                        total_chunks: 0,
                        points: Vec::new(),
                    },
                )],
            )
        } else {
            (
                EventName::StrokeChunk,
                chunks
                    .into_iter()
                    .map(|chunk| StrokeChunkEvent::from_chunk(&stroke, chunk))
                    .collect(),
            )
        };
        let stroke_id = stroke.id.clone();
        let point_count = stroke.points.len();

        // 1. 永続化（失敗したら配信しない）
        if let Err(e) = self.store.upsert(&pass, stroke).await {
            tracing::warn!(
                "Failed to persist stroke '{}' in room '{}': {}",
                stroke_id,
                pass,
                e
            );
            return Err(e.into());
        }
        tracing::debug!(
            "Persisted stroke '{}' ({} points) in room '{}'",
            stroke_id,
            point_count,
            pass
        );

        // 2. 配信（失敗はログのみ）
        let channel = Channel::Room(pass);
        let events = payloads.len();
        let mut failed_publishes = 0;
        for payload in payloads {
            let chunk_index = payload.chunk_index;
            let result = match serde_json::to_value(payload) {
                Ok(value) => self.publisher.publish(&channel, event, value).await,
                Err(e) => Err(PublishError::Encode(e.to_string())),
            };
            if let Err(e) = result {
                failed_publishes += 1;
                tracing::warn!(
                    "Failed to publish '{}' #{} for stroke '{}' on '{}': {}",
                    event,
                    chunk_index,
                    stroke_id,
                    channel,
                    e
                );
            }
        }

        Ok(SaveStrokeOutcome {
            events,
            failed_publishes,
        })
    }
}
