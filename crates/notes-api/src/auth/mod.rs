//! 인증 및 세션 관리.
//!
//! 세션 기반 Bearer 토큰 인증을 제공합니다.
//!
//! # 구성 요소
//!
//! - [`CredentialHasher`]: Argon2id 비밀번호 해싱/검증
//! - [`TokenCodec`]: HS256 토큰 발급/검증
//! - [`AuthService`]: 회원가입, 로그인, 로그아웃, 비밀번호 변경
//! - [`SessionGate`], [`AuthSession`]: 요청 인증 게이트와 Axum 추출기
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn protected_handler(
//!     AuthSession(claims): AuthSession,
//! ) -> impl IntoResponse {
//!     format!("Hello, {}!", claims.user_id)
//! }
//! ```

mod jwt;
mod middleware;
mod password;
mod service;

pub use jwt::{JwtError, TokenCodec};
pub use middleware::{AuthSession, GateError, SessionGate};
pub use password::{CredentialHasher, PasswordError};
pub use service::{
    AuthError, AuthService, ChangePasswordInput, LoginInput, LoginOutput, RegisterInput,
};
