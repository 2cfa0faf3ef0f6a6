//! 인메모리 저장소.
//!
//! 데이터베이스 없이 서비스와 라우터를 테스트하기 위한 구현입니다.
//! 사용자 삭제 시 세션과 노트를 함께 지워 `ON DELETE CASCADE`와 같은 결과를 냅니다.

use async_trait::async_trait;
use notes_core::{Note, Session, User};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NoteStore, SessionStore, StoreError, UserStore};

/// 세 가지 저장소 포트를 모두 구현하는 인메모리 저장소.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    sessions: RwLock<HashMap<Uuid, Session>>,
    notes: RwLock<HashMap<Uuid, Note>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 켜져 있는 동안 모든 연산이 [`StoreError::Unavailable`]로 실패합니다.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }

    /// 저장된 사용자 수.
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    /// 저장된 세션 수.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: &User) -> Result<(), StoreError> {
        self.check()?;
        let mut users = self.users.write().await;
        if users.values().any(|u| u.login == user.login) {
            return Err(StoreError::Conflict("users.login".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.check()?;
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        self.check()?;
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.login == login)
            .cloned())
    }

    async fn update(&self, user: &User) -> Result<(), StoreError> {
        self.check()?;
        if let Some(existing) = self.users.write().await.get_mut(&user.id) {
            existing.password_hash = user.password_hash.clone();
            existing.first_name = user.first_name.clone();
            existing.timezone = user.timezone.clone();
            existing.status = user.status;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.check()?;
        self.users.write().await.remove(&id);
        self.sessions.write().await.retain(|_, s| s.user_id != id);
        self.notes.write().await.retain(|_, n| n.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create(&self, session: &Session) -> Result<(), StoreError> {
        self.check()?;
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(StoreError::Conflict("sessions.id".to_string()));
        }
        sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Session>, StoreError> {
        self.check()?;
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> Result<Vec<Session>, StoreError> {
        self.check()?;
        let mut sessions: Vec<Session> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.created_at);
        Ok(sessions)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.check()?;
        self.sessions.write().await.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn create(&self, note: &Note) -> Result<(), StoreError> {
        self.check()?;
        let mut notes = self.notes.write().await;
        if notes.contains_key(&note.id) {
            return Err(StoreError::Conflict("notes.id".to_string()));
        }
        notes.insert(note.id, note.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Note>, StoreError> {
        self.check()?;
        Ok(self.notes.read().await.get(&id).cloned())
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> Result<Vec<Note>, StoreError> {
        self.check()?;
        let mut notes: Vec<Note> = self
            .notes
            .read()
            .await
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        notes.sort_by(|a, b| {
            b.pinned
                .cmp(&a.pinned)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(notes)
    }

    async fn update(&self, note: &Note) -> Result<(), StoreError> {
        self.check()?;
        if let Some(existing) = self.notes.write().await.get_mut(&note.id) {
            *existing = note.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.check()?;
        self.notes.write().await.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_user_login_is_unique() {
        let store = MemoryStore::new();
        let user = User::new("alice01", "hash", "Alice", "UTC");
        UserStore::create(&store, &user).await.unwrap();

        let dup = User::new("alice01", "hash2", "Other", "UTC");
        let result = UserStore::create(&store, &dup).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert_eq!(store.user_count().await, 1);

        // 로그인은 대소문자를 구분
        let upper = User::new("ALICE01", "hash3", "Upper", "UTC");
        assert!(UserStore::create(&store, &upper).await.is_ok());
    }

    #[tokio::test]
    async fn test_absent_is_ok_none() {
        let store = MemoryStore::new();
        assert!(UserStore::get_by_id(&store, Uuid::new_v4())
            .await
            .unwrap()
            .is_none());
        assert!(SessionStore::get_by_id(&store, Uuid::new_v4())
            .await
            .unwrap()
            .is_none());
        assert!(store.get_by_login("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let store = MemoryStore::new();
        let user = User::new("alice01", "hash", "Alice", "UTC");
        UserStore::create(&store, &user).await.unwrap();
        SessionStore::create(&store, &Session::new(user.id, None))
            .await
            .unwrap();
        NoteStore::create(&store, &Note::new(user.id, Some("t".into()), None, false))
            .await
            .unwrap();

        UserStore::delete(&store, user.id).await.unwrap();

        assert_eq!(store.session_count().await, 0);
        assert!(NoteStore::get_by_user_id(&store, user.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_session_delete_is_idempotent() {
        let store = MemoryStore::new();
        let session = Session::new(Uuid::new_v4(), Some("curl".into()));
        SessionStore::create(&store, &session).await.unwrap();

        SessionStore::delete(&store, session.id).await.unwrap();
        SessionStore::delete(&store, session.id).await.unwrap();
        assert!(SessionStore::get_by_id(&store, session.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_pinned_notes_first() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let plain = Note::new(user_id, Some("plain".into()), None, false);
        let pinned = Note::new(user_id, Some("pinned".into()), None, true);
        NoteStore::create(&store, &plain).await.unwrap();
        NoteStore::create(&store, &pinned).await.unwrap();

        let notes = NoteStore::get_by_user_id(&store, user_id).await.unwrap();
        assert_eq!(notes[0].id, pinned.id);
        assert_eq!(notes[1].id, plain.id);
    }

    #[tokio::test]
    async fn test_unavailable_fails_every_call() {
        let store = MemoryStore::new();
        store.set_unavailable(true);

        assert!(matches!(
            SessionStore::get_by_id(&store, Uuid::new_v4()).await,
            Err(StoreError::Unavailable)
        ));

        store.set_unavailable(false);
        assert!(SessionStore::get_by_id(&store, Uuid::new_v4()).await.is_ok());
    }
}
