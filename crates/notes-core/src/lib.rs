//! # Notes Core
//!
//! 클라우드 노트 백엔드의 핵심 도메인 모델 및 공통 인프라를 제공합니다:
//! - 사용자, 세션, 클레임, 노트 도메인 타입
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
