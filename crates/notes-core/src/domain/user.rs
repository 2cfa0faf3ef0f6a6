//! 사용자 도메인 모델.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoreError;

/// 사용자 계정 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// 가입 대기
    Pending,
    /// 정상
    Active,
    /// 차단됨
    Blocked,
    /// 삭제됨
    Deleted,
}

impl UserStatus {
    /// 저장소에 기록되는 문자열 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Blocked => "blocked",
            Self::Deleted => "deleted",
        }
    }

    /// 로그인이 허용되는 상태인지 확인합니다.
    pub fn can_login(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "blocked" => Ok(Self::Blocked),
            "deleted" => Ok(Self::Deleted),
            other => Err(CoreError::InvalidStatus(other.to_string())),
        }
    }
}

/// 사용자 레코드.
///
/// 비밀번호 해시를 포함하므로 `Serialize`를 구현하지 않으며,
/// `Debug` 출력에서도 해시는 가려집니다.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub login: String,
    /// PHC 형식의 Argon2id 해시
    pub password_hash: String,
    pub first_name: String,
    pub timezone: String,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// 새 활성 사용자를 생성합니다.
    pub fn new(
        login: impl Into<String>,
        password_hash: impl Into<String>,
        first_name: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            login: login.into(),
            password_hash: password_hash.into(),
            first_name: first_name.into(),
            timezone: timezone.into(),
            status: UserStatus::Active,
            created_at: crate::domain::now(),
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("login", &self.login)
            .field("password_hash", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("timezone", &self.timezone)
            .field("status", &self.status)
            .field("created_at", &self.created_at)
            .finish()
    }
}
