//! UseCase: ホワイトボード状態の取得
//!
//! 途中参加したクライアントが、ライブ配信を受け取る前の Stroke を復元するための読み取り経路。

use std::sync::Arc;

use crate::domain::{RoomPass, RoomState, RoomStore};

use super::error::GetWhiteboardStateError;

/// ホワイトボード状態取得のユースケース
pub struct GetWhiteboardStateUseCase {
    store: Arc<dyn RoomStore>,
}

impl GetWhiteboardStateUseCase {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// Room の完成済み Stroke を全て返す（不明または期限切れの Room は空）
    pub async fn execute(&self, pass: &RoomPass) -> Result<RoomState, GetWhiteboardStateError> {
        let state = self.store.get(pass).await.inspect_err(|e| {
            tracing::warn!("Failed to read room '{}': {}", pass, e);
        })?;
        tracing::debug!("Room '{}' has {} stroke(s)", pass, state.len());
        Ok(state)
    }
}
