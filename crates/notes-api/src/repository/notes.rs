//! Notes Repository
//!
//! 노트 관련 데이터베이스 연산을 담당합니다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use notes_core::Note;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{NoteStore, StoreError};

/// notes 테이블 레코드
#[derive(Debug, FromRow)]
struct NoteRecord {
    id: Uuid,
    user_id: Uuid,
    #[sqlx(default)]
    title: Option<String>,
    #[sqlx(default)]
    text: Option<String>,
    pinned: bool,
    #[sqlx(default)]
    updated_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<NoteRecord> for Note {
    fn from(record: NoteRecord) -> Self {
        Note {
            id: record.id,
            user_id: record.user_id,
            title: record.title,
            text: record.text,
            pinned: record.pinned,
            updated_at: record.updated_at,
            created_at: record.created_at,
        }
    }
}

/// PostgreSQL 노트 저장소
#[derive(Clone)]
pub struct PgNoteStore {
    pool: PgPool,
}

impl PgNoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn create(&self, note: &Note) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO notes (id, user_id, title, text, pinned, updated_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(note.id)
        .bind(note.user_id)
        .bind(&note.title)
        .bind(&note.text)
        .bind(note.pinned)
        .bind(note.updated_at)
        .bind(note.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_insert(e, "notes.id"))?;

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Note>, StoreError> {
        let record = sqlx::query_as::<_, NoteRecord>(
            r#"
            SELECT id, user_id, title, text, pinned, updated_at, created_at
            FROM notes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Note::from))
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> Result<Vec<Note>, StoreError> {
        let records = sqlx::query_as::<_, NoteRecord>(
            r#"
            SELECT id, user_id, title, text, pinned, updated_at, created_at
            FROM notes
            WHERE user_id = $1
            ORDER BY pinned DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Note::from).collect())
    }

    async fn update(&self, note: &Note) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE notes
            SET title = $2, text = $3, pinned = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(note.id)
        .bind(&note.title)
        .bind(&note.text)
        .bind(note.pinned)
        .bind(note.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
