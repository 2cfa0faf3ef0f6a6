//! Sessions Repository
//!
//! 로그인 세션 관련 데이터베이스 연산을 담당합니다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use notes_core::Session;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{SessionStore, StoreError};

/// sessions 테이블 레코드
#[derive(Debug, FromRow)]
struct SessionRecord {
    id: Uuid,
    user_id: Uuid,
    #[sqlx(default)]
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<SessionRecord> for Session {
    fn from(record: SessionRecord) -> Self {
        Session {
            id: record.id,
            user_id: record.user_id,
            user_agent: record.user_agent,
            created_at: record.created_at,
        }
    }
}

/// PostgreSQL 세션 저장소
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, session: &Session) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, user_agent, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(&session.user_agent)
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_insert(e, "sessions.id"))?;

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Session>, StoreError> {
        let record = sqlx::query_as::<_, SessionRecord>(
            "SELECT id, user_id, user_agent, created_at FROM sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Session::from))
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> Result<Vec<Session>, StoreError> {
        let records = sqlx::query_as::<_, SessionRecord>(
            r#"
            SELECT id, user_id, user_agent, created_at
            FROM sessions
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Session::from).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
