//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.
//! 서비스들은 같은 [`Storage`]를 공유하며, 요청 사이에 유지되는 가변 상태는
//! 저장소(PostgreSQL 풀 또는 인메모리 저장소) 외에는 없습니다.

use axum::extract::FromRef;
use notes_core::AuthConfig;
use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::{AuthService, CredentialHasher, SessionGate, TokenCodec};
use crate::repository::Storage;
use crate::services::{NotesService, ProfileService};

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 인증 서비스
    pub auth: AuthService,

    /// 프로필 서비스
    pub profile: ProfileService,

    /// 노트 서비스
    pub notes: NotesService,

    /// 요청 인증 게이트
    pub gate: SessionGate,

    /// 데이터베이스 연결 풀 (인메모리 저장소 사용 시 None)
    pub db_pool: Option<PgPool>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 저장소와 인증 구성요소로 AppState를 생성합니다.
    pub fn new(
        storage: Storage,
        hasher: CredentialHasher,
        codec: TokenCodec,
        auth_config: &AuthConfig,
    ) -> Self {
        let codec = Arc::new(codec);

        Self {
            auth: AuthService::new(
                storage.clone(),
                Arc::new(hasher),
                codec.clone(),
                auth_config.revoke_sessions_on_password_change,
            ),
            profile: ProfileService::new(storage.clone()),
            notes: NotesService::new(storage.clone()),
            gate: SessionGate::new(codec, storage.sessions().clone()),
            db_pool: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 헬스 체크용 DB 풀 설정.
    pub fn with_db_pool(mut self, pool: PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// DB 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        if let Some(pool) = &self.db_pool {
            sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
        } else {
            false
        }
    }
}

impl FromRef<Arc<AppState>> for SessionGate {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.gate.clone()
    }
}

/// 테스트용 AppState 생성 헬퍼.
///
/// 인메모리 저장소와 낮은 Argon2 작업량을 사용합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use crate::repository::MemoryStore;
    use notes_core::PasswordConfig;

    let hasher = CredentialHasher::new(&PasswordConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .expect("test hasher");

    AppState::new(
        Storage::in_memory(Arc::new(MemoryStore::new())),
        hasher,
        TokenCodec::new(b"test-secret-key-for-jwt-testing-minimum-32-chars", 0),
        &AuthConfig::default(),
    )
}
