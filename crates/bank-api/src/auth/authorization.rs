//! Authorization 헤더 해석 및 HTTP 요청 인증.
//!
//! gRPC 메타데이터 인증([`crate::grpc`])도 같은 해석 규칙을 사용합니다.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use bank_core::{Payload, TokenMaker};

use super::AuthError;

/// Authorization 헤더/메타데이터 키
pub const AUTHORIZATION_KEY: &str = "authorization";

/// 지원하는 인증 방식 (대소문자 무시)
pub const BEARER_SCHEME: &str = "bearer";

/// `"<scheme> <credential>"` 형식의 값에서 베어러 토큰을 추출합니다.
///
/// 공백으로 분리한 필드가 2개 미만이면 [`AuthError::MalformedHeader`],
/// 방식이 `bearer`가 아니면 [`AuthError::UnsupportedScheme`]입니다.
pub fn parse_authorization(value: &str) -> Result<&str, AuthError> {
    let mut fields = value.split_whitespace();

    let (Some(scheme), Some(credential)) = (fields.next(), fields.next()) else {
        return Err(AuthError::MalformedHeader);
    };

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(AuthError::UnsupportedScheme);
    }

    Ok(credential)
}

/// Authorization 값을 해석하고 토큰을 검증합니다.
pub(crate) fn verify_authorization(
    maker: &dyn TokenMaker,
    value: &str,
) -> Result<Payload, AuthError> {
    let credential = parse_authorization(value)?;
    maker.verify_token(credential).map_err(AuthError::from)
}

/// HTTP 헤더에서 베어러 토큰을 추출해 검증합니다.
///
/// # Errors
///
/// - 헤더 없음: [`AuthError::MissingCredential`]
/// - ASCII가 아닌 값 또는 필드 부족: [`AuthError::MalformedHeader`]
/// - bearer가 아닌 방식: [`AuthError::UnsupportedScheme`]
/// - 토큰 검증 실패: [`AuthError::InvalidToken`]
pub fn authorize_http(maker: &dyn TokenMaker, headers: &HeaderMap) -> Result<Payload, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    verify_authorization(maker, value)
}
