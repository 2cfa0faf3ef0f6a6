//! 노트 도메인 모델.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 사용자 한 명에게 속한 노트.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub text: Option<String>,
    pub pinned: bool,
    /// 마지막 수정 시각 (생성 후 수정되지 않았다면 `None`)
    pub updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn new(user_id: Uuid, title: Option<String>, text: Option<String>, pinned: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            text,
            pinned,
            updated_at: None,
            created_at: crate::domain::now(),
        }
    }

    /// 내용을 교체하고 수정 시각을 기록합니다.
    pub fn apply_update(&mut self, title: Option<String>, text: Option<String>, pinned: bool) {
        self.title = title;
        self.text = text;
        self.pinned = pinned;
        self.updated_at = Some(crate::domain::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_update_sets_updated_at() {
        let mut note = Note::new(Uuid::new_v4(), Some("t".into()), None, false);
        assert!(note.updated_at.is_none());

        note.apply_update(Some("title".into()), Some("body".into()), true);

        assert_eq!(note.title.as_deref(), Some("title"));
        assert_eq!(note.text.as_deref(), Some("body"));
        assert!(note.pinned);
        assert!(note.updated_at.is_some());
    }
}
