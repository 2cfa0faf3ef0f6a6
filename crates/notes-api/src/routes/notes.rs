//! 노트 CRUD endpoint.

use axum::{
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use notes_core::Note;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthSession;
use crate::error::ApiErrorResponse;
use crate::extract::ValidatedJson;
use crate::services::{NoteInput, NotesError};
use crate::state::AppState;

/// `{note_id}` 경로 파라미터.
///
/// UUID가 아니면 400 `INVALID_NOTE_ID` JSON 에러로 응답합니다.
#[derive(Debug, Clone, Copy)]
pub struct NoteIdPath(pub Uuid);

/// [`NoteIdPath`] 거부 사유.
#[derive(Debug)]
pub struct InvalidNoteId;

impl IntoResponse for InvalidNoteId {
    fn into_response(self) -> Response {
        ApiErrorResponse::new("INVALID_NOTE_ID", "invalid note id")
            .into_response_with(StatusCode::BAD_REQUEST)
    }
}

impl<S> FromRequestParts<S> for NoteIdPath
where
    S: Send + Sync,
{
    type Rejection = InvalidNoteId;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(note_id) = <Path<Uuid> as FromRequestParts<S>>::from_request_parts(parts, state)
            .await
            .map_err(|_| InvalidNoteId)?;
        Ok(Self(note_id))
    }
}

/// 노트 작성/수정 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NoteRequest {
    #[validate(required, length(min = 1, max = 1000))]
    pub title: Option<String>,
    #[validate(required, length(min = 1, max = 10000))]
    pub text: Option<String>,
    #[serde(default)]
    pub pinned: bool,
}

impl From<NoteRequest> for NoteInput {
    fn from(req: NoteRequest) -> Self {
        Self {
            title: req.title,
            text: req.text,
            pinned: req.pinned,
        }
    }
}

/// 노트 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NoteResponse {
    pub id: Uuid,
    pub title: Option<String>,
    pub text: Option<String>,
    pub pinned: bool,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            text: note.text,
            pinned: note.pinned,
            updated_at: note.updated_at,
            created_at: note.created_at,
        }
    }
}

/// 노트 목록 응답 (고정 노트 우선, 최신순).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotesResponse {
    pub notes: Vec<NoteResponse>,
}

/// 노트 작성.
#[utoipa::path(
    post,
    path = "/api/v1/notes",
    tag = "notes",
    security(("bearer_auth" = [])),
    request_body = NoteRequest,
    responses(
        (status = 200, description = "작성된 노트", body = NoteResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 422, description = "필드 검증 실패", body = ApiErrorResponse)
    )
)]
pub async fn create_note(
    State(state): State<Arc<AppState>>,
    AuthSession(claims): AuthSession,
    ValidatedJson(req): ValidatedJson<NoteRequest>,
) -> Result<Json<NoteResponse>, NotesError> {
    let note = state.notes.create_note(claims.user_id, req.into()).await?;
    Ok(Json(note.into()))
}

/// 내 노트 목록.
#[utoipa::path(
    get,
    path = "/api/v1/notes",
    tag = "notes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "노트 목록", body = NotesResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    )
)]
pub async fn list_notes(
    State(state): State<Arc<AppState>>,
    AuthSession(claims): AuthSession,
) -> Result<Json<NotesResponse>, NotesError> {
    let notes = state
        .notes
        .list_notes(claims.user_id)
        .await?
        .into_iter()
        .map(NoteResponse::from)
        .collect();

    Ok(Json(NotesResponse { notes }))
}

/// 노트 수정.
#[utoipa::path(
    put,
    path = "/api/v1/notes/{note_id}",
    tag = "notes",
    security(("bearer_auth" = [])),
    params(("note_id" = Uuid, Path, description = "노트 ID")),
    request_body = NoteRequest,
    responses(
        (status = 200, description = "수정된 노트", body = NoteResponse),
        (status = 400, description = "잘못된 노트 ID", body = ApiErrorResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 404, description = "노트 없음", body = ApiErrorResponse)
    )
)]
pub async fn update_note(
    State(state): State<Arc<AppState>>,
    AuthSession(claims): AuthSession,
    NoteIdPath(note_id): NoteIdPath,
    ValidatedJson(req): ValidatedJson<NoteRequest>,
) -> Result<Json<NoteResponse>, NotesError> {
    let note = state
        .notes
        .update_note(claims.user_id, note_id, req.into())
        .await?;
    Ok(Json(note.into()))
}

/// 노트 삭제.
#[utoipa::path(
    delete,
    path = "/api/v1/notes/{note_id}",
    tag = "notes",
    security(("bearer_auth" = [])),
    params(("note_id" = Uuid, Path, description = "노트 ID")),
    responses(
        (status = 204, description = "삭제 완료"),
        (status = 400, description = "잘못된 노트 ID", body = ApiErrorResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 404, description = "노트 없음", body = ApiErrorResponse)
    )
)]
pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    AuthSession(claims): AuthSession,
    NoteIdPath(note_id): NoteIdPath,
) -> Result<StatusCode, NotesError> {
    state.notes.delete_note(claims.user_id, note_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 노트 라우터 생성.
pub fn notes_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_notes).post(create_note))
        .route("/{note_id}", put(update_note).delete(delete_note))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: Option<&str>, text: Option<&str>) -> NoteRequest {
        NoteRequest {
            title: title.map(str::to_string),
            text: text.map(str::to_string),
            pinned: false,
        }
    }

    #[test]
    fn test_note_request_validation() {
        assert!(request(Some("title"), Some("text")).validate().is_ok());
        assert!(request(None, Some("text")).validate().is_err());
        assert!(request(Some(""), Some("text")).validate().is_err());
        assert!(request(Some("title"), Some(&"x".repeat(10_001))).validate().is_err());
    }

    #[test]
    fn test_pinned_defaults_to_false() {
        let req: NoteRequest = serde_json::from_str(r#"{"title":"t","text":"x"}"#).unwrap();
        assert!(!req.pinned);
    }
}
