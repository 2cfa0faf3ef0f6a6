//! 도메인 모델.
//!
//! - [`User`], [`UserStatus`]: 사용자 계정
//! - [`Session`]: 폐기 가능한 로그인 세션
//! - [`Claims`]: 토큰에 담기는 식별 정보
//! - [`Note`]: 사용자 노트

mod claims;
mod note;
mod session;
mod user;

pub use claims::Claims;
pub use note::Note;
pub use session::Session;
pub use user::{User, UserStatus};

use chrono::{DateTime, SubsecRound, Utc};

/// 현재 시각 (마이크로초 단위로 절삭).
///
/// PostgreSQL `TIMESTAMPTZ` 정밀도와 맞춰 저장 전후 값이 동일하게 유지됩니다.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
