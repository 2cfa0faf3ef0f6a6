//! Users Repository
//!
//! 사용자 계정 관련 데이터베이스 연산을 담당합니다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use notes_core::{User, UserStatus};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{StoreError, UserStore};

/// users 테이블 레코드
#[derive(Debug, FromRow)]
struct UserRecord {
    id: Uuid,
    login: String,
    password_hash: String,
    first_name: String,
    timezone: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = StoreError;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let status = record
            .status
            .parse::<UserStatus>()
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        Ok(User {
            id: record.id,
            login: record.login,
            password_hash: record.password_hash,
            first_name: record.first_name,
            timezone: record.timezone,
            status,
            created_at: record.created_at,
        })
    }
}

/// PostgreSQL 사용자 저장소
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, login, password_hash, first_name, timezone, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.login)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.timezone)
        .bind(user.status.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_insert(e, "users.login"))?;

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, login, password_hash, first_name, timezone, status, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn get_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, login, password_hash, first_name, timezone, status, created_at
            FROM users
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn update(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, first_name = $3, timezone = $4, status = $5
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.timezone)
        .bind(user.status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
