//! HTTP API DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use serde_json::Value;

use crate::domain::{Point, ValidationErrors};

/// `POST /api/stroke` のリクエスト
///
/// 全フィールドを型を決めずに `Option<Value>` で受け取る。欠けているフィールドや
/// 型の違うフィールドも、変換時にフィールド単位の検証エラーとしてまとめて返す。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveStrokeRequest {
    pub pass: Option<Value>,
    pub stroke_id: Option<Value>,
    pub token: Option<Value>,
    pub points: Option<Value>,
    pub color: Option<Value>,
    pub width: Option<Value>,
}

/// `POST /api/clear-whiteboard` のリクエスト
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClearWhiteboardRequest {
    pub pass: Option<Value>,
    pub token: Option<Value>,
}

/// `{"status": "success"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

/// スナップショット内の 1 Stroke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeDto {
    pub points: Vec<Point>,
    pub color: String,
    pub width: f64,
    pub timestamp: i64,
    pub token: String,
    pub finished: bool,
}

/// `GET /api/whiteboard/{pass}` のレスポンス（`strokeId` → Stroke）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WhiteboardStateResponse(pub BTreeMap<String, StrokeDto>);

/// エラーレスポンス
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}
