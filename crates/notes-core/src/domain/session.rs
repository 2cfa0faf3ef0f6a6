//! 로그인 세션.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 활성 로그인 하나를 나타내는 영속 레코드.
///
/// 세션의 존재 여부만이 토큰을 신뢰할지 결정합니다.
/// 세션을 삭제하면 해당 토큰은 서명이 유효하더라도 즉시 거부됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: Uuid, user_agent: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            user_agent,
            created_at: crate::domain::now(),
        }
    }
}
