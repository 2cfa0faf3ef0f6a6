//! 토큰 클레임.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Session;

/// 서명된 토큰에 담기는 사용자/세션 식별 정보.
///
/// 서명 검증을 통과한 뒤에만 신뢰할 수 있으며,
/// 그 자체로는 접근 권한을 부여하지 않습니다 (세션 존재 확인 필요).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claims {
    pub user_id: Uuid,
    pub session_id: Uuid,
    /// 세션 생성 시각
    pub created_at: DateTime<Utc>,
}

impl From<&Session> for Claims {
    fn from(session: &Session) -> Self {
        Self {
            user_id: session.user_id,
            session_id: session.id,
            created_at: session.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_from_session() {
        let session = Session::new(Uuid::new_v4(), Some("curl/8.0".into()));
        let claims = Claims::from(&session);

        assert_eq!(claims.user_id, session.user_id);
        assert_eq!(claims.session_id, session.id);
        assert_eq!(claims.created_at, session.created_at);
    }
}
