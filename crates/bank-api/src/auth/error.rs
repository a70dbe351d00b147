//! 요청 인증 에러.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bank_core::TokenError;

use crate::error::error_response;

/// 요청 인증 에러.
///
/// 토큰 검증 실패는 원인과 관계없이 [`AuthError::InvalidToken`] 하나로 전달됩니다.
/// 어떤 에러도 재시도 대상이 아닙니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("메타데이터가 제공되지 않았습니다")]
    MissingMetadata,
    #[error("인증 토큰이 필요합니다")]
    MissingCredential,
    #[error("잘못된 Authorization 헤더 형식")]
    MalformedHeader,
    #[error("Bearer 토큰만 지원합니다")]
    UnsupportedScheme,
    #[error("유효하지 않은 토큰")]
    InvalidToken,
}

impl AuthError {
    /// 기계가 읽을 수 있는 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingMetadata => "MISSING_METADATA",
            AuthError::MissingCredential => "MISSING_CREDENTIAL",
            AuthError::MalformedHeader => "MALFORMED_HEADER",
            AuthError::UnsupportedScheme => "UNSUPPORTED_SCHEME",
            AuthError::InvalidToken => "INVALID_TOKEN",
        }
    }

    /// HTTP 상태 코드. 인증 실패는 모두 401입니다.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl From<TokenError> for AuthError {
    fn from(_: TokenError) -> Self {
        AuthError::InvalidToken
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.to_string())
    }
}

impl From<AuthError> for tonic::Status {
    fn from(err: AuthError) -> Self {
        tonic::Status::unauthenticated(err.to_string())
    }
}
