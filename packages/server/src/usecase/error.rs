//! UseCase layer error types.

use thiserror::Error;

use crate::domain::StoreError;

/// Stroke 保存のエラー
///
/// 配信の失敗はここに含まれない（ログに残すだけで成功扱い）。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveStrokeError {
    #[error("failed to persist stroke: {0}")]
    Store(#[from] StoreError),
}

/// ホワイトボード消去のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClearWhiteboardError {
    #[error("failed to clear whiteboard: {0}")]
    Store(#[from] StoreError),
}

/// ホワイトボード状態取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetWhiteboardStateError {
    #[error("failed to read whiteboard: {0}")]
    Store(#[from] StoreError),
}

/// 一時的な描画イベント中継のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastEphemeralError {
    #[error("payload must be a JSON object")]
    NotAnObject,
}
