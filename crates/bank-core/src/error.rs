//! 서버 기동 단계 에러 타입.

use thiserror::Error;

use crate::token::TokenError;

/// 설정 및 초기화 에러.
#[derive(Debug, Error)]
pub enum BankError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(#[from] config::ConfigError),

    /// 토큰 발급기 초기화 에러
    #[error("토큰 에러: {0}")]
    Token(#[from] TokenError),

    /// 로깅 초기화 에러
    #[error("로깅 초기화 에러: {0}")]
    Logging(String),
}

/// 초기화 작업을 위한 Result 타입.
pub type BankResult<T> = Result<T, BankError>;

impl BankError {
    /// 서버 기동을 중단해야 하는 에러인지 확인합니다.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BankError::Config(_) | BankError::Token(TokenError::WeakKey { .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weak_key_is_fatal() {
        let err = BankError::from(TokenError::WeakKey {
            expected: "최소 32바이트".to_string(),
            actual: 8,
        });
        assert!(err.is_fatal());

        let err = BankError::Logging("already initialized".to_string());
        assert!(!err.is_fatal());
    }
}
