//! Mapping from use case errors to HTTP responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    domain::ValidationErrors,
    infrastructure::dto::http::ErrorResponse,
    usecase::{
        BroadcastEphemeralError, ClearWhiteboardError, GetWhiteboardStateError, SaveStrokeError,
    },
};

const INVALID_DATA_MESSAGE: &str = "The given data was invalid.";

/// HTTP ハンドラが返すエラー
#[derive(Debug)]
pub enum ApiError {
    /// 400: JSON として読めないボディ
    BadRequest(String),
    /// 422: フィールド単位の検証エラー
    Validation(ValidationErrors),
    /// 500: ストア障害
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::BadRequest(message) | Self::Internal(message) => ErrorResponse {
                message,
                errors: None,
            },
            Self::Validation(errors) => ErrorResponse {
                message: INVALID_DATA_MESSAGE.to_string(),
                errors: Some(errors),
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // 構文は正しいが形が合わない（型違い、オブジェクトでない等）
            JsonRejection::JsonDataError(e) => {
                let mut errors = ValidationErrors::new();
                errors.push("body", e.body_text());
                Self::Validation(errors)
            }
            other => Self::BadRequest(other.body_text()),
        }
    }
}

impl From<SaveStrokeError> for ApiError {
    fn from(e: SaveStrokeError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<ClearWhiteboardError> for ApiError {
    fn from(e: ClearWhiteboardError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<GetWhiteboardStateError> for ApiError {
    fn from(e: GetWhiteboardStateError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<BroadcastEphemeralError> for ApiError {
    fn from(e: BroadcastEphemeralError) -> Self {
        let mut errors = ValidationErrors::new();
        errors.push("body", e);
        Self::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StoreError;

    #[test]
    fn test_status_codes() {
        // テスト項目: エラーの種類ごとのステータスコード
        // given (前提条件):
        let mut errors = ValidationErrors::new();
        errors.missing("pass");

        // when (操作):
        let bad_request = ApiError::BadRequest("not json".to_string()).status();
        let validation = ApiError::from(errors).status();
        let internal = ApiError::from(SaveStrokeError::Store(StoreError::Unavailable(
            "down".to_string(),
        )))
        .status();

        // then (期待する結果):
        assert_eq!(bad_request, StatusCode::BAD_REQUEST);
        assert_eq!(validation, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(internal, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_non_object_payload_is_validation_error() {
        // テスト項目: オブジェクトでないペイロードは body フィールドの検証エラー
        // given (前提条件):
        let e = BroadcastEphemeralError::NotAnObject;

        // when (操作):
        let api_error = ApiError::from(e);

        // then (期待する結果):
        let ApiError::Validation(errors) = api_error else {
            panic!("expected validation error");
        };
        assert_eq!(
            errors.messages("body"),
            Some(&["payload must be a JSON object".to_string()][..])
        );
    }
}
