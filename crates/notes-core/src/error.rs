//! 노트 서비스 공통 에러 타입.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 알 수 없는 사용자 상태 값
    #[error("알 수 없는 사용자 상태: {0}")]
    InvalidStatus(String),
}

/// 핵심 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::Config("jwt.secret".to_string());
        assert_eq!(err.to_string(), "설정 에러: jwt.secret");
    }
}
