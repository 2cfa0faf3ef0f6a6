//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/v1/auth` - 가입, 로그인, 로그아웃, 비밀번호 변경, 세션 목록
//! - `/api/v1/profile` - 내 프로필 조회/수정/삭제
//! - `/api/v1/notes` - 노트 CRUD
//! - `/metrics` - Prometheus 메트릭 (레코더가 설치된 경우)
//! - `/swagger-ui` - API 문서

pub mod auth;
pub mod health;
pub mod notes;
pub mod profile;

pub use auth::{
    auth_router, ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest,
    SessionResponse, SessionsResponse,
};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use notes::{notes_router, NoteRequest, NoteResponse, NotesResponse};
pub use profile::{profile_router, ProfileResponse, UpdateProfileRequest};

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::metrics_layer;
use crate::openapi::swagger_ui_router;
use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/api/v1/auth", auth_router())
        .nest("/api/v1/profile", profile_router())
        .nest("/api/v1/notes", notes_router())
}

async fn metrics_handler(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}

/// 미들웨어까지 포함한 애플리케이션 라우터 생성.
///
/// `metrics_handle`이 없으면 `/metrics` 라우트를 마운트하지 않습니다.
pub fn create_app(
    state: Arc<AppState>,
    metrics_handle: Option<PrometheusHandle>,
    request_timeout: Duration,
) -> Router {
    let mut router = Router::new()
        .merge(create_api_router().with_state(state))
        .merge(swagger_ui_router());

    if let Some(handle) = metrics_handle {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics_handler))
                .with_state(handle),
        );
    }

    router
        .layer(middleware::from_fn(metrics_layer))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
}
