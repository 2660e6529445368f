//! Shared application state.

use std::sync::Arc;

use kokuban_shared::time::Clock;

use crate::{
    domain::{ChunkSize, RoomStore},
    infrastructure::publisher::BroadcastFanoutPublisher,
    usecase::{
        BroadcastEphemeralUseCase, ClearWhiteboardUseCase, GetWhiteboardStateUseCase,
        SaveStrokeUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// SaveStrokeUseCase（Stroke 保存のユースケース）
    pub save_stroke_usecase: Arc<SaveStrokeUseCase>,
    /// ClearWhiteboardUseCase（ホワイトボード消去のユースケース）
    pub clear_whiteboard_usecase: Arc<ClearWhiteboardUseCase>,
    /// BroadcastEphemeralUseCase（レガシー中継のユースケース）
    pub broadcast_ephemeral_usecase: Arc<BroadcastEphemeralUseCase>,
    /// GetWhiteboardStateUseCase（ホワイトボード状態取得のユースケース）
    pub get_whiteboard_state_usecase: Arc<GetWhiteboardStateUseCase>,
    /// WebSocket の購読に使う（publish は UseCase 経由のみ）
    pub publisher: Arc<BroadcastFanoutPublisher>,
}

impl AppState {
    /// 依存関係から全ての UseCase を組み立てる
    pub fn new(
        store: Arc<dyn RoomStore>,
        publisher: Arc<BroadcastFanoutPublisher>,
        clock: Arc<dyn Clock>,
        chunk_size: ChunkSize,
    ) -> Self {
        Self {
            save_stroke_usecase: Arc::new(SaveStrokeUseCase::new(
                store.clone(),
                publisher.clone(),
                clock,
                chunk_size,
            )),
            clear_whiteboard_usecase: Arc::new(ClearWhiteboardUseCase::new(
                store.clone(),
                publisher.clone(),
            )),
            broadcast_ephemeral_usecase: Arc::new(BroadcastEphemeralUseCase::new(
                publisher.clone(),
            )),
            get_whiteboard_state_usecase: Arc::new(GetWhiteboardStateUseCase::new(store)),
            publisher,
        }
    }
}
