//! 요청 인증 게이트.
//!
//! Bearer 토큰을 검증하고 세션 존재 여부를 확인한 뒤
//! 검증된 [`Claims`]를 핸들러 인자로 전달합니다.
//!
//! 상태 전이:
//! - 헤더 없음 → 401 `MISSING_TOKEN`
//! - Bearer 형식 아님 → 401 `INVALID_AUTH_HEADER`
//! - 토큰 검증 실패 → 401 `INVALID_TOKEN`
//! - 세션 조회 실패 → 500 `INTERNAL_ERROR`
//! - 세션 없음 → 401 `SESSION_EXPIRED`
//!
//! 게이트는 어떤 저장소도 변경하지 않습니다.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use notes_core::Claims;
use std::sync::Arc;
use tracing::error;

use super::jwt::TokenCodec;
use crate::error::ApiErrorResponse;
use crate::metrics::record_gate_rejection;
use crate::repository::SessionStore;

/// 인증 게이트 에러.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GateError {
    #[error("인증 토큰이 필요합니다")]
    MissingToken,
    #[error("잘못된 Authorization 헤더 형식")]
    InvalidAuthHeader,
    #[error("유효하지 않은 토큰")]
    InvalidToken,
    #[error("세션이 만료되었습니다")]
    SessionExpired,
    #[error("내부 서버 오류")]
    Internal,
}

impl GateError {
    /// 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            GateError::MissingToken => "MISSING_TOKEN",
            GateError::InvalidAuthHeader => "INVALID_AUTH_HEADER",
            GateError::InvalidToken => "INVALID_TOKEN",
            GateError::SessionExpired => "SESSION_EXPIRED",
            GateError::Internal => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let status = match self {
            GateError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        };

        ApiErrorResponse::new(self.code(), self.to_string()).into_response_with(status)
    }
}

/// 토큰 검증 + 세션 확인을 수행하는 게이트.
#[derive(Clone)]
pub struct SessionGate {
    codec: Arc<TokenCodec>,
    sessions: Arc<dyn SessionStore>,
}

impl SessionGate {
    pub fn new(codec: Arc<TokenCodec>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { codec, sessions }
    }

    /// `Authorization` 헤더 값으로 요청을 인증합니다.
    ///
    /// 빈 헤더는 헤더가 없는 것으로 취급합니다.
    pub async fn authenticate(&self, header: Option<&str>) -> Result<Claims, GateError> {
        let header = header
            .filter(|h| !h.is_empty())
            .ok_or(GateError::MissingToken)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(GateError::InvalidAuthHeader)?;

        let claims = self
            .codec
            .decode(token)
            .map_err(|_| GateError::InvalidToken)?;

        let session = self
            .sessions
            .get_by_id(claims.session_id)
            .await
            .map_err(|e| {
                error!(op = "gate.authenticate", session_id = %claims.session_id, error = %e, "Session lookup failed");
                GateError::Internal
            })?;

        match session {
            Some(session) if session.user_id == claims.user_id => Ok(claims),
            _ => Err(GateError::SessionExpired),
        }
    }
}

/// 인증된 세션 추출기.
///
/// ```rust,ignore
/// async fn protected_handler(AuthSession(claims): AuthSession) -> impl IntoResponse {
///     format!("Authenticated user: {}", claims.user_id)
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthSession(pub Claims);

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
    SessionGate: FromRef<S>,
{
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = SessionGate::from_ref(state);

        let result = match parts.headers.get(AUTHORIZATION) {
            None => gate.authenticate(None).await,
            Some(value) => match value.to_str() {
                Ok(header) => gate.authenticate(Some(header)).await,
                Err(_) => Err(GateError::InvalidAuthHeader),
            },
        };

        result.map(AuthSession).inspect_err(|e| record_gate_rejection(e.code()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;
    use notes_core::Session;
    use uuid::Uuid;

    const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-testing-minimum-32-chars";

    fn setup() -> (SessionGate, Arc<TokenCodec>, Arc<MemoryStore>) {
        let codec = Arc::new(TokenCodec::new(TEST_SECRET, 0));
        let store = Arc::new(MemoryStore::new());
        let gate = SessionGate::new(codec.clone(), store.clone());
        (gate, codec, store)
    }

    async fn issue(codec: &TokenCodec, store: &MemoryStore, user_id: Uuid) -> (Session, String) {
        let session = Session::new(user_id, None);
        SessionStore::create(store, &session).await.unwrap();
        let token = codec.encode(&Claims::from(&session)).unwrap();
        (session, token)
    }

    #[tokio::test]
    async fn test_missing_header() {
        let (gate, _, _) = setup();
        assert_eq!(gate.authenticate(None).await, Err(GateError::MissingToken));
        assert_eq!(gate.authenticate(Some("")).await, Err(GateError::MissingToken));
    }

    #[tokio::test]
    async fn test_wrong_scheme() {
        let (gate, _, _) = setup();
        assert_eq!(
            gate.authenticate(Some("Basic dXNlcjpwYXNz")).await,
            Err(GateError::InvalidAuthHeader)
        );
        assert_eq!(
            gate.authenticate(Some("bearer abc")).await,
            Err(GateError::InvalidAuthHeader)
        );
    }

    #[tokio::test]
    async fn test_invalid_token() {
        let (gate, _, _) = setup();
        assert_eq!(
            gate.authenticate(Some("Bearer not.a.token")).await,
            Err(GateError::InvalidToken)
        );
    }

    #[tokio::test]
    async fn test_valid_session() {
        let (gate, codec, store) = setup();
        let user_id = Uuid::new_v4();
        let (session, token) = issue(&codec, &store, user_id).await;

        let claims = gate
            .authenticate(Some(&format!("Bearer {}", token)))
            .await
            .unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.session_id, session.id);
    }

    #[tokio::test]
    async fn test_deleted_session_is_expired() {
        let (gate, codec, store) = setup();
        let (session, token) = issue(&codec, &store, Uuid::new_v4()).await;
        let header = format!("Bearer {}", token);

        SessionStore::delete(store.as_ref(), session.id).await.unwrap();

        // 서명은 여전히 유효
        assert!(codec.decode(&token).is_ok());
        assert_eq!(
            gate.authenticate(Some(&header)).await,
            Err(GateError::SessionExpired)
        );
    }

    #[tokio::test]
    async fn test_session_owner_mismatch_is_expired() {
        let (gate, codec, store) = setup();
        let (session, _) = issue(&codec, &store, Uuid::new_v4()).await;
        let forged = codec
            .encode(&Claims {
                user_id: Uuid::new_v4(),
                session_id: session.id,
                created_at: session.created_at,
            })
            .unwrap();

        assert_eq!(
            gate.authenticate(Some(&format!("Bearer {}", forged))).await,
            Err(GateError::SessionExpired)
        );
    }

    #[tokio::test]
    async fn test_store_failure_is_internal() {
        let (gate, codec, store) = setup();
        let (_, token) = issue(&codec, &store, Uuid::new_v4()).await;
        store.set_unavailable(true);

        assert_eq!(
            gate.authenticate(Some(&format!("Bearer {}", token))).await,
            Err(GateError::Internal)
        );
    }

    #[test]
    fn test_gate_error_responses() {
        for error in [
            GateError::MissingToken,
            GateError::InvalidAuthHeader,
            GateError::InvalidToken,
            GateError::SessionExpired,
        ] {
            assert_eq!(error.into_response().status(), StatusCode::UNAUTHORIZED);
        }
        assert_eq!(
            GateError::Internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
