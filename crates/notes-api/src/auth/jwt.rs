//! JWT 토큰 처리.
//!
//! HS256으로 서명된 Access Token 생성/검증 로직.
//! 토큰은 사용자 ID(`sub`), 세션 ID(`sid`), 세션 생성 시각(`created_at`)을 담으며,
//! 서명이 검증되기 전에는 어떤 필드도 신뢰하지 않습니다.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use notes_core::{Claims, JwtConfig};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT 와이어 페이로드.
#[derive(Debug, Serialize, Deserialize)]
struct TokenPayload {
    /// Subject - 사용자 ID
    sub: Uuid,
    /// Session ID
    sid: Uuid,
    /// 세션 생성 시각 (RFC 3339)
    created_at: DateTime<Utc>,
    /// Issued At (Unix timestamp)
    iat: i64,
    /// Expiration (Unix timestamp). 만료 없는 토큰이면 생략
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

/// JWT 토큰 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("토큰 인코딩 실패: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
    #[error("잘못된 토큰")]
    InvalidToken,
    #[error("토큰 만료 시각을 계산할 수 없습니다")]
    ExpiryOverflow,
}

/// 토큰 코덱.
///
/// 서명 키는 생성 시 한 번만 만들어 재사용합니다.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Option<TimeDelta>,
}

impl TokenCodec {
    /// 비밀키와 만료 시간(분, 0이면 만료 없음)으로 코덱을 생성합니다.
    ///
    /// 표현할 수 없을 만큼 큰 만료 시간은 [`TimeDelta::MAX`]로 고정되며,
    /// 이 경우 [`TokenCodec::encode`]가 [`JwtError::ExpiryOverflow`]를 반환합니다.
    pub fn new(secret: &[u8], ttl_minutes: u64) -> Self {
        let ttl = (ttl_minutes > 0).then(|| {
            i64::try_from(ttl_minutes)
                .ok()
                .and_then(TimeDelta::try_minutes)
                .unwrap_or(TimeDelta::MAX)
        });

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        if ttl.is_none() {
            validation.required_spec_claims.clear();
            validation.validate_exp = false;
        }

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// 설정에서 코덱을 생성합니다.
    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(config.secret.as_bytes(), config.ttl_minutes)
    }

    /// 클레임을 서명된 토큰으로 인코딩합니다.
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let now = Utc::now();
        let exp = match self.ttl {
            Some(ttl) => Some(
                now.checked_add_signed(ttl)
                    .ok_or(JwtError::ExpiryOverflow)?
                    .timestamp(),
            ),
            None => None,
        };
        let payload = TokenPayload {
            sub: claims.user_id,
            sid: claims.session_id,
            created_at: claims.created_at,
            iat: now.timestamp(),
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .map_err(JwtError::from)
    }

    /// 토큰을 검증하고 클레임을 꺼냅니다.
    ///
    /// 서명 불일치, 형식 오류, 누락/타입 불일치 클레임, 만료는 모두
    /// [`JwtError::InvalidToken`]으로 처리됩니다.
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let data = decode::<TokenPayload>(token, &self.decoding_key, &self.validation)
            .map_err(|_| JwtError::InvalidToken)?;

        Ok(Claims {
            user_id: data.claims.sub,
            session_id: data.claims.sid,
            created_at: data.claims.created_at,
        })
    }
}
