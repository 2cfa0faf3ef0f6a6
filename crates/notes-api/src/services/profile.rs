//! 프로필 서비스.

use chrono::{DateTime, Utc};
use notes_core::UserStatus;
use tracing::{error, info};
use uuid::Uuid;

use crate::repository::{Storage, StoreError};

/// 프로필 서비스 에러.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("사용자를 찾을 수 없습니다")]
    UserNotFound,
    #[error("저장소 에러: {0}")]
    StorageFailure(#[from] StoreError),
}

/// 클라이언트에 노출되는 사용자 정보 (비밀번호 해시 제외).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: Uuid,
    pub login: String,
    pub first_name: String,
    pub timezone: String,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

/// 프로필 수정 입력.
#[derive(Debug, Clone)]
pub struct UpdateProfileInput {
    pub first_name: String,
    pub timezone: String,
}

#[derive(Clone)]
pub struct ProfileService {
    storage: Storage,
}

impl ProfileService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<Profile, ProfileError> {
        let user = self
            .storage
            .users()
            .get_by_id(user_id)
            .await
            .map_err(|e| storage_failure("profile.get", e))?
            .ok_or(ProfileError::UserNotFound)?;

        Ok(Profile {
            id: user.id,
            login: user.login,
            first_name: user.first_name,
            timezone: user.timezone,
            status: user.status,
            created_at: user.created_at,
        })
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<(), ProfileError> {
        let op = "profile.update";

        let mut user = self
            .storage
            .users()
            .get_by_id(user_id)
            .await
            .map_err(|e| storage_failure(op, e))?
            .ok_or(ProfileError::UserNotFound)?;

        user.first_name = input.first_name;
        user.timezone = input.timezone;

        self.storage
            .users()
            .update(&user)
            .await
            .map_err(|e| storage_failure(op, e))?;

        info!(op, user_id = %user_id, "Profile updated");
        Ok(())
    }

    /// 계정 삭제.
    ///
    /// 세션을 먼저 모두 폐기한 뒤 사용자를 삭제합니다. 노트는 저장소에서 함께 삭제됩니다.
    pub async fn delete_profile(&self, user_id: Uuid) -> Result<(), ProfileError> {
        let op = "profile.delete";

        let sessions = self
            .storage
            .sessions()
            .get_by_user_id(user_id)
            .await
            .map_err(|e| storage_failure(op, e))?;
        for session in &sessions {
            self.storage
                .sessions()
                .delete(session.id)
                .await
                .map_err(|e| storage_failure(op, e))?;
        }

        self.storage
            .users()
            .delete(user_id)
            .await
            .map_err(|e| storage_failure(op, e))?;

        info!(op, user_id = %user_id, sessions = sessions.len(), "Account deleted");
        Ok(())
    }
}

fn storage_failure(op: &'static str, err: StoreError) -> ProfileError {
    error!(op, error = %err, "Storage operation failed");
    ProfileError::StorageFailure(err)
}
