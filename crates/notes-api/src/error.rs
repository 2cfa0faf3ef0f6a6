//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.
//! 서비스 계층 에러는 여기서 HTTP 상태 코드와 에러 코드로 변환됩니다.
//! 저장소/해싱 실패는 서비스에서 이미 기록되었으므로 응답에는 상세 정보를 싣지 않습니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::auth::AuthError;
use crate::services::{NotesError, ProfileError};

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "NOTE_NOT_FOUND",
///   "message": "노트를 찾을 수 없습니다",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "INVALID_TOKEN", "VALIDATION_ERROR")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }

    /// 상세 정보 없는 500 응답 본문.
    pub fn internal() -> Self {
        Self::new("INTERNAL_ERROR", "내부 서버 오류")
    }

    /// 상태 코드와 함께 응답으로 변환합니다.
    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AuthError::LoginAlreadyExists => (StatusCode::CONFLICT, "LOGIN_ALREADY_EXISTS"),
            AuthError::UserNotFound => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            AuthError::InvalidPassword => (StatusCode::FORBIDDEN, "INVALID_PASSWORD"),
            AuthError::UserBlocked => (StatusCode::FORBIDDEN, "USER_BLOCKED"),
            AuthError::HashingFailure
            | AuthError::TokenIssueFailure
            | AuthError::StorageFailure(_) => {
                return ApiErrorResponse::internal()
                    .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
            }
        };

        ApiErrorResponse::new(code, self.to_string()).into_response_with(status)
    }
}

impl IntoResponse for ProfileError {
    fn into_response(self) -> Response {
        match &self {
            ProfileError::UserNotFound => ApiErrorResponse::new("USER_NOT_FOUND", self.to_string())
                .into_response_with(StatusCode::NOT_FOUND),
            ProfileError::StorageFailure(_) => {
                ApiErrorResponse::internal().into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

impl IntoResponse for NotesError {
    fn into_response(self) -> Response {
        match &self {
            NotesError::NoteNotFound => ApiErrorResponse::new("NOTE_NOT_FOUND", self.to_string())
                .into_response_with(StatusCode::NOT_FOUND),
            NotesError::StorageFailure(_) => {
                ApiErrorResponse::internal().into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
