//! 저장소 포트 및 구현.
//!
//! 서비스 계층은 작은 async trait([`UserStore`], [`SessionStore`], [`NoteStore`])에만 의존합니다.
//! 구현은 두 가지입니다:
//! - PostgreSQL ([`PgUserStore`], [`PgSessionStore`], [`PgNoteStore`])
//! - 테스트용 인메모리 저장소 ([`MemoryStore`])
//!
//! 조회 연산은 `Result<Option<T>, StoreError>`를 반환하여
//! "없음"(`Ok(None)`)과 "조회 실패"(`Err`)를 구분합니다.

pub mod memory;
pub mod notes;
pub mod sessions;
pub mod users;

pub use memory::MemoryStore;
pub use notes::PgNoteStore;
pub use sessions::PgSessionStore;
pub use users::PgUserStore;

use async_trait::async_trait;
use notes_core::{Note, Session, User};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// 저장소 에러.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(#[from] sqlx::Error),

    /// 유일성 제약 위반
    #[error("중복된 값: {0}")]
    Conflict(String),

    /// 저장된 값을 도메인 타입으로 변환할 수 없음
    #[error("손상된 레코드: {0}")]
    Corrupt(String),

    /// 저장소를 사용할 수 없음
    #[error("저장소를 사용할 수 없음")]
    Unavailable,
}

impl StoreError {
    /// 유일성 제약 위반이면 [`StoreError::Conflict`]로, 아니면 그대로 변환합니다.
    pub(crate) fn from_insert(err: sqlx::Error, what: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(what.to_string())
            }
            _ => Self::Database(err),
        }
    }
}

/// 사용자(자격증명) 저장소.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 새 사용자를 저장합니다. 로그인이 이미 있으면 [`StoreError::Conflict`].
    async fn create(&self, user: &User) -> Result<(), StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn get_by_login(&self, login: &str) -> Result<Option<User>, StoreError>;

    /// 로그인을 제외한 필드를 갱신합니다.
    async fn update(&self, user: &User) -> Result<(), StoreError>;

    /// 사용자를 삭제합니다. 세션과 노트도 함께 삭제됩니다.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// 세션 저장소.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, session: &Session) -> Result<(), StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Session>, StoreError>;

    /// 사용자의 모든 세션 (생성 순).
    async fn get_by_user_id(&self, user_id: Uuid) -> Result<Vec<Session>, StoreError>;

    /// 세션을 삭제합니다. 없는 세션이어도 에러가 아닙니다.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// 노트 저장소.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn create(&self, note: &Note) -> Result<(), StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Note>, StoreError>;

    /// 사용자의 모든 노트 (고정 노트 먼저, 최신 순).
    async fn get_by_user_id(&self, user_id: Uuid) -> Result<Vec<Note>, StoreError>;

    async fn update(&self, note: &Note) -> Result<(), StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// 서비스들이 공유하는 저장소 묶음.
#[derive(Clone)]
pub struct Storage {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    notes: Arc<dyn NoteStore>,
}

impl Storage {
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        notes: Arc<dyn NoteStore>,
    ) -> Self {
        Self {
            users,
            sessions,
            notes,
        }
    }

    /// PostgreSQL 연결 풀 기반 저장소.
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgSessionStore::new(pool.clone())),
            Arc::new(PgNoteStore::new(pool)),
        )
    }

    /// 하나의 [`MemoryStore`]를 공유하는 인메모리 저장소.
    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self::new(store.clone(), store.clone(), store)
    }

    pub fn users(&self) -> &Arc<dyn UserStore> {
        &self.users
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    pub fn notes(&self) -> &Arc<dyn NoteStore> {
        &self.notes
    }
}

/// 스키마 마이그레이션을 실행합니다.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
