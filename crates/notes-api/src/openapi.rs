//! OpenAPI 문서화 설정.
//!
//! utoipa로 OpenAPI 3 스펙을 생성하고 `/swagger-ui`에 Swagger UI를 마운트합니다.
//! 새 엔드포인트를 추가할 때는 핸들러의 `#[utoipa::path]`와 요청/응답 타입을
//! 아래 `paths(...)`, `components(schemas(...))`에 등록합니다.

use axum::Router;
use notes_core::UserStatus;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiErrorResponse;
use crate::routes::{
    ChangePasswordRequest, ComponentHealth, ComponentStatus, HealthResponse, LoginRequest,
    LoginResponse, NoteRequest, NoteResponse, NotesResponse, ProfileResponse, RegisterRequest,
    SessionResponse, SessionsResponse, UpdateProfileRequest,
};

/// `bearer_auth` 보안 스킴 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Cloud Notes API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cloud Notes API",
        description = r#"
# Cloud Notes REST API

사용자 가입/로그인, 세션 기반 Bearer 인증, 노트 CRUD를 제공합니다.

## 인증

`POST /api/v1/auth/login`으로 받은 토큰을 `Authorization: Bearer <token>` 헤더에 포함하세요.
로그아웃하면 해당 세션의 토큰은 즉시 무효화됩니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "로컬 개발 서버"),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "헬스 체크"),
        (name = "auth", description = "인증 - 가입, 로그인, 세션"),
        (name = "profile", description = "프로필"),
        (name = "notes", description = "노트")
    ),
    components(
        schemas(
            // ===== Common =====
            ApiErrorResponse,
            UserStatus,

            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Auth =====
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            ChangePasswordRequest,
            SessionResponse,
            SessionsResponse,

            // ===== Profile =====
            ProfileResponse,
            UpdateProfileRequest,

            // ===== Notes =====
            NoteRequest,
            NoteResponse,
            NotesResponse,
        )
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::change_password,
        crate::routes::auth::list_sessions,

        crate::routes::profile::get_profile,
        crate::routes::profile::update_profile,
        crate::routes::profile::delete_profile,

        crate::routes::notes::create_note,
        crate::routes::notes::list_notes,
        crate::routes::notes::update_note,
        crate::routes::notes::delete_note,
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// - `/swagger-ui` - Swagger UI
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        assert!(json.contains("Cloud Notes API"));
        assert!(json.contains("/health/ready"));
        assert!(json.contains("/api/v1/auth/login"));
        assert!(json.contains("/api/v1/profile"));
        assert!(json.contains("/api/v1/notes/{note_id}"));
    }

    #[test]
    fn test_openapi_has_bearer_scheme() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();

        assert!(json.contains("bearer_auth"));
        assert!(json.contains("JWT"));
        assert!(json.contains("ApiErrorResponse"));
        assert!(json.contains("NoteResponse"));
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }
}
