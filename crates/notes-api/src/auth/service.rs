//! 인증 서비스.
//!
//! 회원가입, 로그인, 로그아웃, 비밀번호 변경, 세션 목록 조회를 담당합니다.
//! 모든 저장소/해싱 실패는 `op` 필드와 함께 기록되고 [`AuthError::StorageFailure`]
//! 또는 [`AuthError::HashingFailure`]로 반환됩니다.

use notes_core::{Claims, Session, User};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::jwt::TokenCodec;
use super::password::CredentialHasher;
use crate::metrics::record_login;
use crate::repository::{Storage, StoreError};

/// 인증 서비스 에러.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("이미 사용 중인 로그인입니다")]
    LoginAlreadyExists,
    #[error("사용자를 찾을 수 없습니다")]
    UserNotFound,
    #[error("비밀번호가 올바르지 않습니다")]
    InvalidPassword,
    #[error("로그인할 수 없는 계정 상태입니다")]
    UserBlocked,
    #[error("비밀번호 해싱 실패")]
    HashingFailure,
    #[error("토큰 발급 실패")]
    TokenIssueFailure,
    #[error("저장소 에러: {0}")]
    StorageFailure(#[from] StoreError),
}

/// 회원가입 입력.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub login: String,
    pub password: String,
    pub first_name: String,
    pub timezone: String,
}

/// 로그인 입력.
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub login: String,
    pub password: String,
    pub user_agent: Option<String>,
}

/// 로그인 결과.
#[derive(Debug, Clone)]
pub struct LoginOutput {
    pub token: String,
    pub claims: Claims,
}

/// 비밀번호 변경 입력.
#[derive(Debug, Clone)]
pub struct ChangePasswordInput {
    pub user_id: Uuid,
    /// 요청을 보낸 세션 (세션 폐기 정책에서 제외됨)
    pub current_session_id: Option<Uuid>,
    pub old_password: String,
    pub new_password: String,
}

/// 인증 서비스.
#[derive(Clone)]
pub struct AuthService {
    storage: Storage,
    hasher: Arc<CredentialHasher>,
    codec: Arc<TokenCodec>,
    revoke_sessions_on_password_change: bool,
}

impl AuthService {
    pub fn new(
        storage: Storage,
        hasher: Arc<CredentialHasher>,
        codec: Arc<TokenCodec>,
        revoke_sessions_on_password_change: bool,
    ) -> Self {
        Self {
            storage,
            hasher,
            codec,
            revoke_sessions_on_password_change,
        }
    }

    /// 회원가입.
    ///
    /// 활성 상태의 사용자를 생성합니다. 세션이나 토큰은 발급하지 않습니다.
    pub async fn register(&self, input: RegisterInput) -> Result<User, AuthError> {
        let op = "auth.register";

        let existing = self
            .storage
            .users()
            .get_by_login(&input.login)
            .await
            .map_err(|e| storage_failure(op, e))?;
        if existing.is_some() {
            return Err(AuthError::LoginAlreadyExists);
        }

        let password_hash = self.hash_password(op, input.password).await?;
        let user = User::new(input.login, password_hash, input.first_name, input.timezone);

        match self.storage.users().create(&user).await {
            Ok(()) => {}
            // 동시 가입으로 유일성 제약에 걸린 경우
            Err(StoreError::Conflict(_)) => return Err(AuthError::LoginAlreadyExists),
            Err(e) => return Err(storage_failure(op, e)),
        }

        info!(op, user_id = %user.id, "User registered");
        Ok(user)
    }

    /// 로그인.
    ///
    /// 세션을 먼저 저장한 뒤 토큰을 발급합니다. 세션 저장에 실패하면 토큰은 발급되지 않습니다.
    pub async fn login(&self, input: LoginInput) -> Result<LoginOutput, AuthError> {
        let op = "auth.login";

        let user = self
            .storage
            .users()
            .get_by_login(&input.login)
            .await
            .map_err(|e| storage_failure(op, e))?;

        let Some(user) = user else {
            // 존재하지 않는 로그인도 같은 검증 비용을 치름
            self.verify_dummy(input.password).await;
            record_login("user_not_found");
            return Err(AuthError::UserNotFound);
        };

        if !self
            .verify_password(op, input.password, user.password_hash.clone())
            .await?
        {
            record_login("invalid_password");
            return Err(AuthError::InvalidPassword);
        }

        if !user.status.can_login() {
            warn!(op, user_id = %user.id, status = %user.status, "Login rejected by account status");
            record_login("blocked");
            return Err(AuthError::UserBlocked);
        }

        let session = Session::new(user.id, input.user_agent);
        self.storage
            .sessions()
            .create(&session)
            .await
            .map_err(|e| storage_failure(op, e))?;

        let claims = Claims::from(&session);
        let token = match self.codec.encode(&claims) {
            Ok(token) => token,
            Err(e) => {
                error!(op, error = %e, "Token encoding failed");
                if let Err(e) = self.storage.sessions().delete(session.id).await {
                    warn!(op, session_id = %session.id, error = %e, "Failed to remove orphan session");
                }
                return Err(AuthError::TokenIssueFailure);
            }
        };

        record_login("success");
        info!(op, user_id = %user.id, session_id = %session.id, "User logged in");
        Ok(LoginOutput { token, claims })
    }

    /// 로그아웃. 세션이 이미 없어도 성공합니다.
    pub async fn logout(&self, session_id: Uuid) -> Result<(), AuthError> {
        let op = "auth.logout";

        self.storage
            .sessions()
            .delete(session_id)
            .await
            .map_err(|e| storage_failure(op, e))?;

        info!(op, session_id = %session_id, "Session revoked");
        Ok(())
    }

    /// 비밀번호 변경.
    pub async fn change_password(&self, input: ChangePasswordInput) -> Result<(), AuthError> {
        let op = "auth.change_password";

        let mut user = self
            .storage
            .users()
            .get_by_id(input.user_id)
            .await
            .map_err(|e| storage_failure(op, e))?
            .ok_or(AuthError::UserNotFound)?;

        if !self
            .verify_password(op, input.old_password, user.password_hash.clone())
            .await?
        {
            return Err(AuthError::InvalidPassword);
        }

        user.password_hash = self.hash_password(op, input.new_password).await?;
        self.storage
            .users()
            .update(&user)
            .await
            .map_err(|e| storage_failure(op, e))?;

        if self.revoke_sessions_on_password_change {
            let revoked = self
                .revoke_other_sessions(op, user.id, input.current_session_id)
                .await?;
            info!(op, user_id = %user.id, revoked, "Password changed, other sessions revoked");
        } else {
            info!(op, user_id = %user.id, "Password changed");
        }

        Ok(())
    }

    /// 사용자의 활성 세션 목록.
    pub async fn list_sessions(&self, user_id: Uuid) -> Result<Vec<Session>, AuthError> {
        self.storage
            .sessions()
            .get_by_user_id(user_id)
            .await
            .map_err(|e| storage_failure("auth.list_sessions", e))
    }

    async fn revoke_other_sessions(
        &self,
        op: &'static str,
        user_id: Uuid,
        keep: Option<Uuid>,
    ) -> Result<usize, AuthError> {
        let sessions = self
            .storage
            .sessions()
            .get_by_user_id(user_id)
            .await
            .map_err(|e| storage_failure(op, e))?;

        let mut revoked = 0;
        for session in sessions.iter().filter(|s| Some(s.id) != keep) {
            self.storage
                .sessions()
                .delete(session.id)
                .await
                .map_err(|e| storage_failure(op, e))?;
            revoked += 1;
        }
        Ok(revoked)
    }

    async fn hash_password(&self, op: &'static str, password: String) -> Result<String, AuthError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                error!(op, error = %e, "Hashing task failed");
                AuthError::HashingFailure
            })?
            .map_err(|e| {
                error!(op, error = %e, "Password hashing failed");
                AuthError::HashingFailure
            })
    }

    async fn verify_password(
        &self,
        op: &'static str,
        password: String,
        hash: String,
    ) -> Result<bool, AuthError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| {
                error!(op, error = %e, "Verification task failed");
                AuthError::HashingFailure
            })?
            .map_err(|e| {
                error!(op, error = %e, "Stored password hash is invalid");
                AuthError::HashingFailure
            })
    }

    async fn verify_dummy(&self, password: String) {
        let hasher = Arc::clone(&self.hasher);
        if let Err(e) = tokio::task::spawn_blocking(move || hasher.verify_dummy(&password)).await {
            debug!(error = %e, "Dummy verification task failed");
        }
    }
}

fn storage_failure(op: &'static str, err: StoreError) -> AuthError {
    error!(op, error = %err, "Storage operation failed");
    AuthError::StorageFailure(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MemoryStore, SessionStore, UserStore};
    use notes_core::{PasswordConfig, UserStatus};

    const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-testing-minimum-32-chars";

    fn setup(revoke: bool) -> (AuthService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let hasher = CredentialHasher::new(&PasswordConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();
        let service = AuthService::new(
            Storage::in_memory(store.clone()),
            Arc::new(hasher),
            Arc::new(TokenCodec::new(TEST_SECRET, 0)),
            revoke,
        );
        (service, store)
    }

    fn register_input(login: &str, password: &str) -> RegisterInput {
        RegisterInput {
            login: login.to_string(),
            password: password.to_string(),
            first_name: "Alice".to_string(),
            timezone: "Europe/Moscow".to_string(),
        }
    }

    fn login_input(login: &str, password: &str) -> LoginInput {
        LoginInput {
            login: login.to_string(),
            password: password.to_string(),
            user_agent: Some("test-agent".to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_creates_active_user_with_hashed_password() {
        let (service, store) = setup(false);

        let user = service
            .register(register_input("alice01", "hunter22"))
            .await
            .unwrap();

        assert_eq!(user.status, UserStatus::Active);
        assert_ne!(user.password_hash, "hunter22");
        assert!(user.password_hash.starts_with("$argon2id$"));
        assert_eq!(store.user_count().await, 1);
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_register_duplicate_login() {
        let (service, store) = setup(false);
        service
            .register(register_input("alice01", "hunter22"))
            .await
            .unwrap();

        let result = service.register(register_input("alice01", "other-pass")).await;

        assert!(matches!(result, Err(AuthError::LoginAlreadyExists)));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let (service, _) = setup(false);
        let result = service.login(login_input("nobody00", "hunter22")).await;
        assert!(matches!(result, Err(AuthError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (service, store) = setup(false);
        service
            .register(register_input("alice01", "hunter22"))
            .await
            .unwrap();

        let result = service.login(login_input("alice01", "hunter23")).await;

        assert!(matches!(result, Err(AuthError::InvalidPassword)));
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_login_persists_session_matching_token() {
        let (service, store) = setup(false);
        let user = service
            .register(register_input("alice01", "hunter22"))
            .await
            .unwrap();

        let output = service
            .login(login_input("alice01", "hunter22"))
            .await
            .unwrap();

        assert!(!output.token.is_empty());
        assert_eq!(output.claims.user_id, user.id);

        let session = SessionStore::get_by_id(store.as_ref(), output.claims.session_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.user_id, user.id);
        assert_eq!(session.user_agent.as_deref(), Some("test-agent"));
        assert_eq!(session.created_at, output.claims.created_at);
    }

    #[tokio::test]
    async fn test_login_blocked_user() {
        let (service, store) = setup(false);
        let mut user = service
            .register(register_input("alice01", "hunter22"))
            .await
            .unwrap();
        user.status = UserStatus::Blocked;
        UserStore::update(store.as_ref(), &user).await.unwrap();

        let result = service.login(login_input("alice01", "hunter22")).await;

        assert!(matches!(result, Err(AuthError::UserBlocked)));
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_login_fails_without_token_when_session_store_fails() {
        let (service, store) = setup(false);
        service
            .register(register_input("alice01", "hunter22"))
            .await
            .unwrap();
        store.set_unavailable(true);

        let result = service.login(login_input("alice01", "hunter22")).await;

        assert!(matches!(result, Err(AuthError::StorageFailure(_))));
    }

    #[tokio::test]
    async fn test_login_token_failure_removes_session() {
        let (base, store) = setup(false);
        base.register(register_input("alice01", "hunter22"))
            .await
            .unwrap();
        let service = AuthService::new(
            Storage::in_memory(store.clone()),
            base.hasher.clone(),
            Arc::new(TokenCodec::new(TEST_SECRET, u64::MAX)),
            false,
        );

        let result = service.login(login_input("alice01", "hunter22")).await;

        assert!(matches!(result, Err(AuthError::TokenIssueFailure)));
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let (service, store) = setup(false);
        service
            .register(register_input("alice01", "hunter22"))
            .await
            .unwrap();
        let output = service
            .login(login_input("alice01", "hunter22"))
            .await
            .unwrap();

        service.logout(output.claims.session_id).await.unwrap();
        service.logout(output.claims.session_id).await.unwrap();
        service.logout(Uuid::new_v4()).await.unwrap();

        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_change_password() {
        let (service, store) = setup(false);
        let user = service
            .register(register_input("alice01", "hunter22"))
            .await
            .unwrap();
        let first = service
            .login(login_input("alice01", "hunter22"))
            .await
            .unwrap();

        service
            .change_password(ChangePasswordInput {
                user_id: user.id,
                current_session_id: Some(first.claims.session_id),
                old_password: "hunter22".to_string(),
                new_password: "correct-horse".to_string(),
            })
            .await
            .unwrap();

        assert!(service
            .login(login_input("alice01", "correct-horse"))
            .await
            .is_ok());
        assert!(matches!(
            service.login(login_input("alice01", "hunter22")).await,
            Err(AuthError::InvalidPassword)
        ));
        // 기본 정책: 기존 세션 유지
        assert!(SessionStore::get_by_id(store.as_ref(), first.claims.session_id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_change_password_wrong_old_password() {
        let (service, _) = setup(false);
        let user = service
            .register(register_input("alice01", "hunter22"))
            .await
            .unwrap();

        let result = service
            .change_password(ChangePasswordInput {
                user_id: user.id,
                current_session_id: None,
                old_password: "not-the-password".to_string(),
                new_password: "correct-horse".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::InvalidPassword)));
        assert!(service.login(login_input("alice01", "hunter22")).await.is_ok());
    }

    #[tokio::test]
    async fn test_change_password_revokes_other_sessions_when_enabled() {
        let (service, store) = setup(true);
        let user = service
            .register(register_input("alice01", "hunter22"))
            .await
            .unwrap();
        let current = service
            .login(login_input("alice01", "hunter22"))
            .await
            .unwrap();
        let other = service
            .login(login_input("alice01", "hunter22"))
            .await
            .unwrap();

        service
            .change_password(ChangePasswordInput {
                user_id: user.id,
                current_session_id: Some(current.claims.session_id),
                old_password: "hunter22".to_string(),
                new_password: "correct-horse".to_string(),
            })
            .await
            .unwrap();

        let sessions = service.list_sessions(user.id).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, current.claims.session_id);
        assert!(SessionStore::get_by_id(store.as_ref(), other.claims.session_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_sessions() {
        let (service, _) = setup(false);
        let user = service
            .register(register_input("alice01", "hunter22"))
            .await
            .unwrap();
        service
            .login(login_input("alice01", "hunter22"))
            .await
            .unwrap();
        service
            .login(login_input("alice01", "hunter22"))
            .await
            .unwrap();

        let sessions = service.list_sessions(user.id).await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert!(sessions.iter().all(|s| s.user_id == user.id));
    }
}
