//! Cloud Notes REST API 서버.
//!
//! # 모듈 구성
//!
//! - [`auth`]: 비밀번호 해싱, 토큰 코덱, 인증 서비스, 요청 인증 게이트
//! - [`repository`]: 저장소 포트와 PostgreSQL/인메모리 구현
//! - [`services`]: 프로필/노트 서비스
//! - [`routes`]: REST API 엔드포인트
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;

pub use auth::{AuthError, AuthService, AuthSession, CredentialHasher, SessionGate, TokenCodec};
pub use error::ApiErrorResponse;
pub use extract::ValidatedJson;
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use repository::{run_migrations, MemoryStore, Storage, StoreError};
pub use routes::{create_api_router, create_app};
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
