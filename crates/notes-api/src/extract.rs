//! 검증 포함 JSON 추출기.
//!
//! JSON 문법 오류는 400 `INVALID_JSON`으로 응답합니다.
//! 필드 누락/타입 불일치와 `validator` 검증 실패는 422 `VALIDATION_ERROR`(필드 이름 포함)로 응답합니다.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use validator::{Validate, ValidationErrors};

use crate::error::ApiErrorResponse;

/// 역직렬화 후 `validator`로 검증하는 JSON 추출기.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

/// [`ValidatedJson`] 거부 사유.
#[derive(Debug)]
pub enum JsonInputError {
    /// 본문이 JSON이 아니거나 스키마와 맞지 않음
    InvalidJson(JsonRejection),
    /// 필드 검증 실패
    Validation(ValidationErrors),
}

impl JsonInputError {
    /// 검증에 실패한 필드 이름 (정렬됨).
    fn invalid_fields(errors: &ValidationErrors) -> Vec<String> {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        fields
    }

    fn validation_response(fields: Vec<String>) -> Response {
        let message = match fields.first() {
            Some(field) => format!("invalid field: {}", field),
            None => "invalid request".to_string(),
        };

        ApiErrorResponse::with_details("VALIDATION_ERROR", message, json!({ "fields": fields }))
            .into_response_with(StatusCode::UNPROCESSABLE_ENTITY)
    }
}

/// 역직렬화 에러 메시지에서 문제가 된 필드 경로를 꺼냅니다.
///
/// 타입 불일치는 `...target type: <path>: <serde 메시지>`,
/// 루트 필드 누락은 ``...target type: missing field `<name>` ...`` 형식입니다.
fn data_error_field(text: &str) -> Option<String> {
    let (_, detail) = text.split_once("target type: ")?;

    if let Some(rest) = detail.strip_prefix("missing field `") {
        return rest.split_once('`').map(|(name, _)| name.to_string());
    }

    let (path, _) = detail.split_once(": ")?;
    let is_path = !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'));
    is_path.then(|| path.to_string())
}

impl IntoResponse for JsonInputError {
    fn into_response(self) -> Response {
        match self {
            JsonInputError::InvalidJson(JsonRejection::JsonDataError(err)) => {
                let fields = data_error_field(&err.body_text()).into_iter().collect();
                Self::validation_response(fields)
            }
            JsonInputError::InvalidJson(rejection) => {
                ApiErrorResponse::new("INVALID_JSON", "invalid json")
                    .into_response_with(rejection.status())
            }
            JsonInputError::Validation(errors) => {
                Self::validation_response(Self::invalid_fields(&errors))
            }
        }
    }
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = JsonInputError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = <Json<T> as FromRequest<S>>::from_request(req, state)
            .await
            .map_err(JsonInputError::InvalidJson)?;

        value.validate().map_err(JsonInputError::Validation)?;
        Ok(Self(value))
    }
}
