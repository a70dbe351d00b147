//! HMAC-SHA256 서명 JWT 백엔드.
//!
//! 허용 알고리즘은 생성 시점에 `HS256` 하나로 고정됩니다.
//! 토큰 헤더의 `alg` 값은 검증 방식 결정에 사용되지 않습니다.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{reject, Payload, TokenError, TokenKind, TokenMaker};

/// 서명 키 최소 길이 (바이트)
pub const MIN_SECRET_KEY_SIZE: usize = 32;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT 클레임.
///
/// 알 수 없는 필드나 누락된 필드가 있으면 역직렬화에 실패합니다.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SignedClaims {
    /// JWT ID - 페이로드 ID
    jti: String,
    /// Subject - 사용자 이름
    sub: String,
    /// Issued At (Unix timestamp)
    iat: i64,
    /// Expiration (Unix timestamp)
    exp: i64,
}

impl From<&Payload> for SignedClaims {
    fn from(payload: &Payload) -> Self {
        Self {
            jti: payload.id.to_string(),
            sub: payload.username.clone(),
            iat: payload.issued_at.timestamp(),
            exp: payload.expires_at.timestamp(),
        }
    }
}

impl SignedClaims {
    fn into_payload(self) -> Result<Payload, &'static str> {
        let id = Uuid::parse_str(&self.jti).map_err(|_| "invalid_jti")?;
        let issued_at = timestamp(self.iat).ok_or("invalid_iat")?;
        let expires_at = timestamp(self.exp).ok_or("invalid_exp")?;

        Ok(Payload {
            id,
            username: self.sub,
            issued_at,
            expires_at,
        })
    }
}

fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

/// HMAC 서명 토큰 발급기.
pub struct JwtMaker {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtMaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtMaker")
            .field("algorithm", &ALGORITHM)
            .finish_non_exhaustive()
    }
}

impl JwtMaker {
    /// 비밀 키로 발급기 생성.
    ///
    /// # Arguments
    ///
    /// * `secret` - 최소 32바이트 비밀 키
    ///
    /// # Errors
    ///
    /// 키가 32바이트 미만이면 [`TokenError::WeakKey`]
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.len() < MIN_SECRET_KEY_SIZE {
            return Err(TokenError::WeakKey {
                expected: format!("최소 {}바이트", MIN_SECRET_KEY_SIZE),
                actual: secret.len(),
            });
        }

        // 만료 검사는 Payload::check_validity에서 명시적 시각으로 수행
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub", "jti"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }
}

impl TokenMaker for JwtMaker {
    fn kind(&self) -> TokenKind {
        TokenKind::Signed
    }

    fn create_token_at(
        &self,
        username: &str,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<(String, Payload), TokenError> {
        let payload = Payload::new(Uuid::new_v4(), username, duration, now)?;

        let token = encode(
            &Header::new(ALGORITHM),
            &SignedClaims::from(&payload),
            &self.encoding_key,
        )
        .map_err(|e| TokenError::KeyGeneration(e.to_string()))?;

        Ok((token, payload))
    }

    fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Payload, TokenError> {
        let data = decode::<SignedClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| {
                let reason = match e.kind() {
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => "invalid_signature",
                    jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => "unexpected_algorithm",
                    jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_) => "missing_claim",
                    jsonwebtoken::errors::ErrorKind::Json(_) => "invalid_claims",
                    _ => "malformed_token",
                };
                reject(TokenKind::Signed, reason)
            },
        )?;

        let payload = data
            .claims
            .into_payload()
            .map_err(|reason| reject(TokenKind::Signed, reason))?;

        payload
            .check_validity(now)
            .map_err(|v| reject(TokenKind::Signed, v.as_str()))?;

        Ok(payload)
    }
}
