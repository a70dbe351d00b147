//! AES-256-GCM 봉인 토큰 백엔드.
//!
//! 클레임을 JSON으로 직렬화한 뒤 AES-256-GCM으로 암호화합니다.
//!
//! ## 토큰 형식
//! - `base64url(nonce(12바이트) || ciphertext || tag(16바이트))`, 패딩 없음
//! - 토큰마다 고유한 랜덤 nonce 사용
//! - 연관 데이터(AAD)로 형식 라벨을 묶어 다른 용도의 암호문과 섞이지 않도록 함
//!
//! 키 없이는 클레임을 읽을 수 없습니다.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng, Payload as AeadPayload},
    Aes256Gcm, Nonce,
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{reject, Payload, TokenError, TokenKind, TokenMaker};

/// AES-256 키 크기 (바이트)
pub const SEALED_KEY_SIZE: usize = 32;

/// AES-256-GCM nonce 크기 (바이트)
const NONCE_SIZE: usize = 12;

/// 인증 태그 크기 (바이트)
const TAG_SIZE: usize = 16;

const ASSOCIATED_DATA: &[u8] = b"bank-token.sealed.v1";

/// 봉인되는 클레임.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SealedClaims {
    id: Uuid,
    username: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    issued_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    expires_at: DateTime<Utc>,
}

impl From<&Payload> for SealedClaims {
    fn from(payload: &Payload) -> Self {
        Self {
            id: payload.id,
            username: payload.username.clone(),
            issued_at: payload.issued_at,
            expires_at: payload.expires_at,
        }
    }
}

impl From<SealedClaims> for Payload {
    fn from(claims: SealedClaims) -> Self {
        Self {
            id: claims.id,
            username: claims.username,
            issued_at: claims.issued_at,
            expires_at: claims.expires_at,
        }
    }
}

/// 봉인 토큰 발급기
pub struct SealedMaker {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for SealedMaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SealedMaker").finish_non_exhaustive()
    }
}

impl SealedMaker {
    /// 대칭 키로 발급기 생성
    ///
    /// # Arguments
    /// * `key` - 정확히 32바이트 키
    pub fn new(key: &[u8]) -> Result<Self, TokenError> {
        if key.len() != SEALED_KEY_SIZE {
            return Err(TokenError::WeakKey {
                expected: format!("정확히 {}바이트", SEALED_KEY_SIZE),
                actual: key.len(),
            });
        }

        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| TokenError::WeakKey {
            expected: format!("정확히 {}바이트", SEALED_KEY_SIZE),
            actual: key.len(),
        })?;

        Ok(Self { cipher })
    }

    /// 랜덤 nonce 생성
    fn generate_nonce() -> [u8; NONCE_SIZE] {
        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);
        nonce
    }

    fn seal(&self, claims: &SealedClaims) -> Result<String, TokenError> {
        let plaintext =
            serde_json::to_vec(claims).map_err(|e| TokenError::KeyGeneration(e.to_string()))?;

        let nonce_bytes = Self::generate_nonce();
        let ciphertext = self
            .cipher
            .encrypt(
                Nonce::from_slice(&nonce_bytes),
                AeadPayload {
                    msg: &plaintext,
                    aad: ASSOCIATED_DATA,
                },
            )
            .map_err(|e| TokenError::KeyGeneration(e.to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);

        Ok(URL_SAFE_NO_PAD.encode(sealed))
    }

    fn open(&self, token: &str) -> Result<SealedClaims, &'static str> {
        let sealed = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| "malformed_encoding")?;

        if sealed.len() < NONCE_SIZE + TAG_SIZE {
            return Err("truncated");
        }

        let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);
        let plaintext = self
            .cipher
            .decrypt(
                Nonce::from_slice(nonce),
                AeadPayload {
                    msg: ciphertext,
                    aad: ASSOCIATED_DATA,
                },
            )
            .map_err(|_| "authentication_failed")?;

        serde_json::from_slice(&plaintext).map_err(|_| "invalid_claims")
    }
}

impl TokenMaker for SealedMaker {
    fn kind(&self) -> TokenKind {
        TokenKind::Sealed
    }

    fn create_token_at(
        &self,
        username: &str,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<(String, Payload), TokenError> {
        let payload = Payload::new(Uuid::new_v4(), username, duration, now)?;
        let token = self.seal(&SealedClaims::from(&payload))?;
        Ok((token, payload))
    }

    fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Payload, TokenError> {
        let payload: Payload = self
            .open(token)
            .map_err(|reason| reject(TokenKind::Sealed, reason))?
            .into();

        payload
            .check_validity(now)
            .map_err(|v| reject(TokenKind::Sealed, v.as_str()))?;

        Ok(payload)
    }
}
