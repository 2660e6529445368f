//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use crate::{
    domain::{RoomPass, ValidationErrors},
    infrastructure::dto::http::{
        ClearWhiteboardRequest, SaveStrokeRequest, StatusResponse, WhiteboardStateResponse,
    },
    ui::{error::ApiError, state::AppState},
    usecase::{ClearWhiteboardCommand, EphemeralPayload, SaveStrokeCommand},
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// `POST /api/stroke`: 完成した Stroke を保存し、チャンクに分けて Room へ配信
pub async fn save_stroke(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SaveStrokeRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(request) = body?;
    // DTO から検証済みコマンドへの変換（失敗したらストアには触れない）
    let command = SaveStrokeCommand::try_from(request).inspect_err(|errors| {
        tracing::debug!("Rejected stroke: {}", errors);
    })?;

    let outcome = state.save_stroke_usecase.execute(command).await?;
    if outcome.failed_publishes > 0 {
        tracing::debug!(
            "{} of {} event(s) were not delivered",
            outcome.failed_publishes,
            outcome.events
        );
    }
    Ok(Json(StatusResponse::success()))
}

/// `GET /api/whiteboard/{pass}`: Room の完成済み Stroke を全て返す
pub async fn get_whiteboard(
    State(state): State<Arc<AppState>>,
    Path(pass): Path<String>,
) -> Result<Json<WhiteboardStateResponse>, ApiError> {
    let pass = RoomPass::new(pass).map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.push("pass", e);
        ApiError::Validation(errors)
    })?;

    let room_state = state.get_whiteboard_state_usecase.execute(&pass).await?;
    // Domain Model から DTO への変換
    Ok(Json(room_state.into()))
}

/// `POST /api/clear-whiteboard`: Room の状態を消去して通知
pub async fn clear_whiteboard(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ClearWhiteboardRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(request) = body?;
    let command = ClearWhiteboardCommand::try_from(request)?;

    state.clear_whiteboard_usecase.execute(command).await?;
    Ok(Json(StatusResponse::success()))
}

/// `POST /api/drawing`: 描画途中のイベントをそのまま中継（レガシー）
pub async fn broadcast_drawing(
    State(state): State<Arc<AppState>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(value) = body?;
    let payload = EphemeralPayload::new(value)?;

    state
        .broadcast_ephemeral_usecase
        .broadcast_drawing(payload)
        .await;
    Ok(Json(StatusResponse::success()))
}

/// `POST /api/stroke-end`: Stroke 終了のイベントをそのまま中継（レガシー）
pub async fn broadcast_stroke_end(
    State(state): State<Arc<AppState>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(value) = body?;
    let payload = EphemeralPayload::new(value)?;

    state
        .broadcast_ephemeral_usecase
        .broadcast_stroke_end(payload)
        .await;
    Ok(Json(StatusResponse::success()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChunkSize, RoomStore, StoreError, repository::MockRoomStore},
        infrastructure::{
            publisher::BroadcastFanoutPublisher, repository::InMemoryRoomStore,
        },
    };
    use kokuban_shared::time::FixedClock;
    use serde_json::json;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - ハンドラ関数を直接呼び出し、ステータスとボディの組み立てを確認する
    // - 検証エラーのリクエストがストアに到達しないこと
    //
    // 【なぜこのテストが必要か】
    // - HTTP の振る舞い（422 / 500 / 成功レスポンス）は外部との契約
    // ========================================

    fn create_state(store: Arc<dyn RoomStore>) -> Arc<AppState> {
        Arc::new(AppState::new(
            store,
            Arc::new(BroadcastFanoutPublisher::default()),
            Arc::new(FixedClock::new(1_000)),
            ChunkSize::default(),
        ))
    }

    fn create_inmemory_state() -> Arc<AppState> {
        create_state(Arc::new(InMemoryRoomStore::with_default_ttl(Arc::new(
            FixedClock::new(1_000),
        ))))
    }

    fn stroke_request(pass: &str, stroke_id: &str) -> SaveStrokeRequest {
        SaveStrokeRequest {
            pass: Some(json!(pass)),
            stroke_id: Some(json!(stroke_id)),
            token: Some(json!("tok1")),
            points: Some(json!([[0, 0], [1, 1]])),
            color: Some(json!("red")),
            width: Some(json!(2)),
        }
    }

    #[tokio::test]
    async fn test_save_then_get_whiteboard() {
        // テスト項目: 保存した Stroke がスナップショットに現れる
        // given (前提条件):
        let state = create_inmemory_state();

        // when (操作):
        let saved = save_stroke(State(state.clone()), Ok(Json(stroke_request("roomA", "s1"))))
            .await
            .unwrap();
        let Json(snapshot) = get_whiteboard(State(state), Path("roomA".to_string()))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(saved.0, StatusResponse::success());
        let s1 = snapshot.0.get("s1").unwrap();
        assert_eq!(s1.color, "red");
        assert_eq!(s1.token, "tok1");
        assert_eq!(s1.timestamp, 1_000);
        assert!(s1.finished);
    }

    #[tokio::test]
    async fn test_invalid_stroke_never_reaches_store() {
        // テスト項目: 検証エラーは 422 になり、ストアは呼ばれない
        // given (前提条件):
        let mut store = MockRoomStore::new();
        store.expect_upsert().times(0);
        let state = create_state(Arc::new(store));
        let request = SaveStrokeRequest {
            width: Some(json!(-1)),
            ..stroke_request("roomA", "s1")
        };

        // when (操作):
        let result = save_stroke(State(state), Ok(Json(request))).await;

        // then (期待する結果):
        let Err(ApiError::Validation(errors)) = result else {
            panic!("expected validation error");
        };
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["width"]);
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_error() {
        // テスト項目: ストア障害は 500 になる
        // given (前提条件):
        let mut store = MockRoomStore::new();
        store
            .expect_upsert()
            .returning(|_, _| Err(StoreError::Unavailable("down".to_string())));
        let state = create_state(Arc::new(store));

        // when (操作):
        let result = save_stroke(State(state), Ok(Json(stroke_request("roomA", "s1")))).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ApiError::Internal(_))));
    }

    #[tokio::test]
    async fn test_get_whiteboard_rejects_overlong_pass() {
        // テスト項目: 長すぎる pass は 422
        // given (前提条件):
        let state = create_inmemory_state();

        // when (操作):
        let result = get_whiteboard(State(state), Path("x".repeat(51))).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_clear_then_get_is_empty() {
        // テスト項目: 消去後のスナップショットは空
        // given (前提条件):
        let state = create_inmemory_state();
        save_stroke(State(state.clone()), Ok(Json(stroke_request("roomA", "s1"))))
            .await
            .unwrap();

        // when (操作):
        clear_whiteboard(
            State(state.clone()),
            Ok(Json(ClearWhiteboardRequest {
                pass: Some(json!("roomA")),
                token: Some(json!("tok1")),
            })),
        )
        .await
        .unwrap();
        let Json(snapshot) = get_whiteboard(State(state), Path("roomA".to_string()))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(snapshot.0.is_empty());
    }

    #[tokio::test]
    async fn test_legacy_drawing_is_relayed_to_global_channel() {
        // テスト項目: /api/drawing のペイロードは whiteboard チャンネルにそのまま流れる
        // given (前提条件):
        let state = create_inmemory_state();
        let mut rx = state
            .publisher
            .subscribe(&crate::domain::Channel::Legacy)
            .await;

        // when (操作):
        broadcast_drawing(
            State(state),
            Ok(Json(serde_json::json!({"x": 10, "y": 20}))),
        )
        .await
        .unwrap();

        // then (期待する結果):
        let frame: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(frame["channel"], "whiteboard");
        assert_eq!(frame["event"], "drawing.updated");
        assert_eq!(frame["data"], serde_json::json!({"x": 10, "y": 20}));
    }

    #[tokio::test]
    async fn test_legacy_stroke_end_rejects_non_object() {
        // テスト項目: オブジェクトでないボディは 422
        // given (前提条件):
        let state = create_inmemory_state();

        // when (操作):
        let result = broadcast_stroke_end(State(state), Ok(Json(serde_json::json!([1, 2])))).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
