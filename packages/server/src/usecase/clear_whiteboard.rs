//! UseCase: ホワイトボード消去処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ClearWhiteboardUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - `whiteboard.cleared` を受け取ったクライアントが直後にスナップショットを取得しても
//!   消去前の Stroke が返らないこと（消去 → 配信の順序）を保証する
//! - 他の Room に影響しないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：Stroke のある Room の消去
//! - 異常系：ストア障害、配信障害
//! - エッジケース：存在しない Room の消去

use std::sync::Arc;

use crate::domain::{
    Channel, ClientToken, EventName, FanoutPublisher, PublishError, RoomPass, RoomStore,
    WhiteboardClearedEvent,
};

use super::error::ClearWhiteboardError;

/// 検証済みのホワイトボード消去コマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearWhiteboardCommand {
    pub pass: RoomPass,
    /// 消去を要求したクライアント
    pub token: ClientToken,
}

/// ホワイトボード消去のユースケース
pub struct ClearWhiteboardUseCase {
    store: Arc<dyn RoomStore>,
    publisher: Arc<dyn FanoutPublisher>,
}

impl ClearWhiteboardUseCase {
    pub fn new(store: Arc<dyn RoomStore>, publisher: Arc<dyn FanoutPublisher>) -> Self {
        Self { store, publisher }
    }

    /// ホワイトボード消去を実行
    ///
    /// Room の状態を削除してから `whiteboard.cleared` を Room チャンネルへ配信する。
    /// 配信の失敗はログに残すだけで成功扱い。
    pub async fn execute(&self, command: ClearWhiteboardCommand) -> Result<(), ClearWhiteboardError> {
        if let Err(e) = self.store.clear(&command.pass).await {
            tracing::warn!("Failed to clear room '{}': {}", command.pass, e);
            return Err(e.into());
        }
        tracing::info!(
            "Room '{}' cleared by '{}'",
            command.pass,
            command.token.as_str()
        );

        let payload = WhiteboardClearedEvent::new(&command.pass, &command.token);
        let channel = Channel::Room(command.pass);
        let result = match serde_json::to_value(payload) {
            Ok(value) => {
                self.publisher
                    .publish(&channel, EventName::WhiteboardCleared, value)
                    .await
            }
            Err(e) => Err(PublishError::Encode(e.to_string())),
        };
        if let Err(e) = result {
            tracing::warn!(
                "Failed to publish '{}' on '{}': {}",
                EventName::WhiteboardCleared,
                channel,
                e
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{StoreError, entity::test_support::stroke, repository::MockRoomStore},
        infrastructure::repository::InMemoryRoomStore,
        usecase::test_support::{FailingPublisher, RecordingPublisher, StoreProbingPublisher},
    };
    use kokuban_shared::time::FixedClock;

    fn pass(value: &str) -> RoomPass {
        RoomPass::new(value.to_string()).unwrap()
    }

    fn command(value: &str) -> ClearWhiteboardCommand {
        ClearWhiteboardCommand {
            pass: pass(value),
            token: ClientToken::new("tok1".to_string()).unwrap(),
        }
    }

    async fn create_store_with_strokes() -> Arc<InMemoryRoomStore> {
        let store = Arc::new(InMemoryRoomStore::with_default_ttl(Arc::new(
            FixedClock::new(1_000),
        )));
        store.upsert(&pass("roomA"), stroke("s1", &[(0.0, 0.0)])).await.unwrap();
        store.upsert(&pass("roomA"), stroke("s2", &[(1.0, 1.0)])).await.unwrap();
        store.upsert(&pass("roomB"), stroke("s3", &[(2.0, 2.0)])).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_clear_removes_room_state_and_publishes() {
        // テスト項目: 消去後の Room は空になり、whiteboard.cleared が配信される
        // given (前提条件):
        let store = create_store_with_strokes().await;
        let publisher = Arc::new(RecordingPublisher::default());
        let usecase = ClearWhiteboardUseCase::new(store.clone(), publisher.clone());

        // when (操作):
        let result = usecase.execute(command("roomA")).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(store.get(&pass("roomA")).await.unwrap().is_empty());
        let published = publisher.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].channel, "whiteboard.roomA");
        assert_eq!(published[0].event, EventName::WhiteboardCleared);
        assert_eq!(
            published[0].payload,
            serde_json::json!({"pass": "roomA", "token": "tok1"})
        );
    }

    #[tokio::test]
    async fn test_clear_happens_before_publish() {
        // テスト項目: 配信の時点で既に Room の状態が消えている
        // given (前提条件):
        let store = create_store_with_strokes().await;
        let publisher = Arc::new(StoreProbingPublisher::new(store.clone(), pass("roomA")));
        let usecase = ClearWhiteboardUseCase::new(store, publisher.clone());

        // when (操作):
        usecase.execute(command("roomA")).await.unwrap();

        // then (期待する結果):
        assert_eq!(publisher.strokes_seen(), vec![0]);
    }

    #[tokio::test]
    async fn test_clear_leaves_other_rooms_untouched() {
        // テスト項目: 他の Room の状態は変わらない
        // given (前提条件):
        let store = create_store_with_strokes().await;
        let usecase =
            ClearWhiteboardUseCase::new(store.clone(), Arc::new(RecordingPublisher::default()));

        // when (操作):
        usecase.execute(command("roomA")).await.unwrap();

        // then (期待する結果):
        assert_eq!(store.get(&pass("roomB")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_unknown_room_succeeds() {
        // テスト項目: 存在しない Room の消去も成功し、通知は配信される
        // given (前提条件):
        let store = create_store_with_strokes().await;
        let publisher = Arc::new(RecordingPublisher::default());
        let usecase = ClearWhiteboardUseCase::new(store, publisher.clone());

        // when (操作):
        let result = usecase.execute(command("nowhere")).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(publisher.published().len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_reported_and_nothing_is_published() {
        // テスト項目: ストアの消去に失敗したらエラーを返し、通知しない
        // given (前提条件):
        let mut store = MockRoomStore::new();
        store
            .expect_clear()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("connection reset".to_string())));
        let publisher = Arc::new(RecordingPublisher::default());
        let usecase = ClearWhiteboardUseCase::new(Arc::new(store), publisher.clone());

        // when (操作):
        let result = usecase.execute(command("roomA")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ClearWhiteboardError::Store(StoreError::Unavailable(
                "connection reset".to_string()
            )))
        );
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn test_publish_failure_still_reports_success() {
        // テスト項目: 配信に失敗しても消去は成功扱い
        // given (前提条件):
        let store = create_store_with_strokes().await;
        let publisher = Arc::new(FailingPublisher::default());
        let usecase = ClearWhiteboardUseCase::new(store.clone(), publisher.clone());

        // when (操作):
        let result = usecase.execute(command("roomA")).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(publisher.attempts(), 1);
        assert!(store.get(&pass("roomA")).await.unwrap().is_empty());
    }
}
