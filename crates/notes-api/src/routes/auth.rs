//! 인증 endpoint.
//!
//! - POST /api/v1/auth/register
//! - POST /api/v1/auth/login
//! - POST /api/v1/auth/logout
//! - POST /api/v1/auth/change-password
//! - GET  /api/v1/auth/sessions

use axum::{
    extract::State,
    http::{header::USER_AGENT, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{AuthError, AuthSession, ChangePasswordInput, LoginInput, RegisterInput};
use crate::error::ApiErrorResponse;
use crate::extract::ValidatedJson;
use crate::state::AppState;

// ==================== 요청/응답 타입 ====================
//
// 비밀번호를 담는 요청 타입은 로그 노출을 막기 위해 Debug를 구현하지 않습니다.

/// 회원가입 요청.
#[derive(Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 6, max = 32))]
    pub login: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 2, max = 32))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub timezone: String,
}

/// 로그인 요청.
#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub login: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// 로그인 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer 토큰
    pub access_token: String,
    /// 토큰 타입 (항상 "Bearer")
    pub token_type: String,
}

/// 비밀번호 변경 요청.
#[derive(Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 8))]
    pub old_password: String,
    #[validate(length(min = 8))]
    pub new_password: String,
}

/// 활성 세션 정보.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub id: Uuid,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    /// 이 요청을 보낸 세션인지 여부
    pub current: bool,
}

/// 세션 목록 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionResponse>,
}

// ==================== 핸들러 ====================

/// 회원가입.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 204, description = "가입 완료"),
        (status = 409, description = "이미 사용 중인 로그인", body = ApiErrorResponse),
        (status = 422, description = "필드 검증 실패", body = ApiErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<StatusCode, AuthError> {
    state
        .auth
        .register(RegisterInput {
            login: req.login,
            password: req.password,
            first_name: req.first_name,
            timezone: req.timezone,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// 로그인.
///
/// 새 세션을 만들고 Bearer 토큰을 발급합니다. `User-Agent` 헤더는 세션에 기록됩니다.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = LoginResponse),
        (status = 403, description = "잘못된 비밀번호 또는 차단된 계정", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let output = state
        .auth
        .login(LoginInput {
            login: req.login,
            password: req.password,
            user_agent,
        })
        .await?;

    Ok(Json(LoginResponse {
        access_token: output.token,
        token_type: "Bearer".to_string(),
    }))
}

/// 로그아웃 (현재 세션 폐기).
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "세션 폐기됨"),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    )
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    AuthSession(claims): AuthSession,
) -> Result<StatusCode, AuthError> {
    state.auth.logout(claims.session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 비밀번호 변경.
#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "변경 완료"),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 403, description = "기존 비밀번호 불일치", body = ApiErrorResponse)
    )
)]
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    AuthSession(claims): AuthSession,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<StatusCode, AuthError> {
    state
        .auth
        .change_password(ChangePasswordInput {
            user_id: claims.user_id,
            current_session_id: Some(claims.session_id),
            old_password: req.old_password,
            new_password: req.new_password,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// 활성 세션 목록.
#[utoipa::path(
    get,
    path = "/api/v1/auth/sessions",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "세션 목록", body = SessionsResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    )
)]
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    AuthSession(claims): AuthSession,
) -> Result<Json<SessionsResponse>, AuthError> {
    let sessions = state
        .auth
        .list_sessions(claims.user_id)
        .await?
        .into_iter()
        .map(|s| SessionResponse {
            current: s.id == claims.session_id,
            id: s.id,
            user_agent: s.user_agent,
            created_at: s.created_at,
        })
        .collect();

    Ok(Json(SessionsResponse { sessions }))
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/change-password", post(change_password))
        .route("/sessions", get(list_sessions))
}
