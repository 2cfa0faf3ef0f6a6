//! 노트 서비스.
//!
//! 모든 연산은 호출자 소유의 노트에만 적용됩니다.
//! 다른 사용자의 노트는 존재하지 않는 것과 같이 [`NotesError::NoteNotFound`]로 처리합니다.

use notes_core::Note;
use tracing::{error, info};
use uuid::Uuid;

use crate::repository::{Storage, StoreError};

/// 노트 서비스 에러.
#[derive(Debug, thiserror::Error)]
pub enum NotesError {
    #[error("노트를 찾을 수 없습니다")]
    NoteNotFound,
    #[error("저장소 에러: {0}")]
    StorageFailure(#[from] StoreError),
}

/// 노트 작성/수정 입력.
#[derive(Debug, Clone, Default)]
pub struct NoteInput {
    pub title: Option<String>,
    pub text: Option<String>,
    pub pinned: bool,
}

#[derive(Clone)]
pub struct NotesService {
    storage: Storage,
}

impl NotesService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub async fn create_note(&self, user_id: Uuid, input: NoteInput) -> Result<Note, NotesError> {
        let op = "notes.create";
        let note = Note::new(user_id, input.title, input.text, input.pinned);

        self.storage
            .notes()
            .create(&note)
            .await
            .map_err(|e| storage_failure(op, e))?;

        info!(op, user_id = %user_id, note_id = %note.id, "Note created");
        Ok(note)
    }

    pub async fn list_notes(&self, user_id: Uuid) -> Result<Vec<Note>, NotesError> {
        self.storage
            .notes()
            .get_by_user_id(user_id)
            .await
            .map_err(|e| storage_failure("notes.list", e))
    }

    pub async fn update_note(
        &self,
        user_id: Uuid,
        note_id: Uuid,
        input: NoteInput,
    ) -> Result<Note, NotesError> {
        let op = "notes.update";
        let mut note = self.owned_note(op, user_id, note_id).await?;

        note.apply_update(input.title, input.text, input.pinned);
        self.storage
            .notes()
            .update(&note)
            .await
            .map_err(|e| storage_failure(op, e))?;

        info!(op, user_id = %user_id, note_id = %note_id, "Note updated");
        Ok(note)
    }

    pub async fn delete_note(&self, user_id: Uuid, note_id: Uuid) -> Result<(), NotesError> {
        let op = "notes.delete";
        self.owned_note(op, user_id, note_id).await?;

        self.storage
            .notes()
            .delete(note_id)
            .await
            .map_err(|e| storage_failure(op, e))?;

        info!(op, user_id = %user_id, note_id = %note_id, "Note deleted");
        Ok(())
    }

    async fn owned_note(
        &self,
        op: &'static str,
        user_id: Uuid,
        note_id: Uuid,
    ) -> Result<Note, NotesError> {
        self.storage
            .notes()
            .get_by_id(note_id)
            .await
            .map_err(|e| storage_failure(op, e))?
            .filter(|note| note.user_id == user_id)
            .ok_or(NotesError::NoteNotFound)
    }
}

fn storage_failure(op: &'static str, err: StoreError) -> NotesError {
    error!(op, error = %err, "Storage operation failed");
    NotesError::StorageFailure(err)
}
