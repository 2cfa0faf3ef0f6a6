//! 프로필 endpoint.
//!
//! 모든 핸들러는 인증된 세션의 사용자에게만 적용됩니다.

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use notes_core::UserStatus;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthSession;
use crate::error::ApiErrorResponse;
use crate::extract::ValidatedJson;
use crate::services::{Profile, ProfileError, UpdateProfileInput};
use crate::state::AppState;

/// 프로필 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub login: String,
    pub first_name: String,
    pub timezone: String,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            login: profile.login,
            first_name: profile.first_name,
            timezone: profile.timezone,
            status: profile.status,
            created_at: profile.created_at,
        }
    }
}

/// 프로필 수정 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 32))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub timezone: String,
}

/// 내 프로필 조회.
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    tag = "profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "프로필", body = ProfileResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    )
)]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    AuthSession(claims): AuthSession,
) -> Result<Json<ProfileResponse>, ProfileError> {
    let profile = state.profile.get_profile(claims.user_id).await?;
    Ok(Json(profile.into()))
}

/// 내 프로필 수정.
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    tag = "profile",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 204, description = "수정 완료"),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 422, description = "필드 검증 실패", body = ApiErrorResponse)
    )
)]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthSession(claims): AuthSession,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<StatusCode, ProfileError> {
    state
        .profile
        .update_profile(
            claims.user_id,
            UpdateProfileInput {
                first_name: req.first_name,
                timezone: req.timezone,
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// 계정 삭제 (세션과 노트 포함).
#[utoipa::path(
    delete,
    path = "/api/v1/profile",
    tag = "profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "삭제 완료"),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    )
)]
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    AuthSession(claims): AuthSession,
) -> Result<StatusCode, ProfileError> {
    state.profile.delete_profile(claims.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 프로필 라우터 생성.
pub fn profile_router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/",
        get(get_profile).put(update_profile).delete(delete_profile),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{LoginInput, RegisterInput};
    use crate::state::create_test_state;
    use axum::{
        body::Body,
        http::{header::AUTHORIZATION, header::CONTENT_TYPE, Request},
    };
    use tower::ServiceExt;

    async fn setup() -> (Router, String) {
        let state = Arc::new(create_test_state());
        state
            .auth
            .register(RegisterInput {
                login: "alice01".to_string(),
                password: "hunter22".to_string(),
                first_name: "Alice".to_string(),
                timezone: "UTC".to_string(),
            })
            .await
            .unwrap();
        let output = state
            .auth
            .login(LoginInput {
                login: "alice01".to_string(),
                password: "hunter22".to_string(),
                user_agent: None,
            })
            .await
            .unwrap();

        let app = Router::new()
            .nest("/api/v1/profile", profile_router())
            .with_state(state);
        (app, format!("Bearer {}", output.token))
    }

    #[tokio::test]
    async fn test_get_profile() {
        let (app, auth) = setup().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/profile")
                    .header(AUTHORIZATION, auth)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["login"], "alice01");
        assert_eq!(json["status"], "active");
        assert!(json.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_get_profile_requires_token() {
        let (app, _) = setup().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/profile")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_update_profile_validation() {
        let (app, auth) = setup().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/v1/profile")
                    .header(AUTHORIZATION, auth)
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"first_name":"A","timezone":"UTC"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
