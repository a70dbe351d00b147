//! 베어러 토큰 발급 및 검증.
//!
//! 두 가지 백엔드가 동일한 [`TokenMaker`] 계약을 구현합니다:
//!
//! - [`JwtMaker`]: HMAC-SHA256 서명 JWT (클레임은 읽을 수 있지만 위조 불가)
//! - [`SealedMaker`]: AES-256-GCM 봉인 토큰 (클레임 기밀성까지 보장)
//!
//! 어느 백엔드를 쓸지는 배포 설정([`TokenConfig`])으로 결정되며,
//! 호출 측은 `Arc<dyn TokenMaker>`만 다룹니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! let maker = JwtMaker::new(secret)?;
//! let (token, payload) = maker.create_token("alice", Duration::minutes(15))?;
//! let verified = maker.verify_token(&token)?;
//! assert_eq!(verified.id, payload.id);
//! ```

mod jwt;
mod payload;
mod sealed;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::TokenConfig;

pub use jwt::{JwtMaker, MIN_SECRET_KEY_SIZE};
pub use payload::{Payload, ValidityViolation};
pub use sealed::{SealedMaker, SEALED_KEY_SIZE};

/// 토큰 처리 에러.
///
/// 검증 실패는 원인과 관계없이 [`TokenError::InvalidToken`] 하나로만 표현됩니다.
/// 구체적인 원인은 `tracing::debug!`로만 남깁니다.
#[derive(Debug, Error)]
pub enum TokenError {
    /// 키 길이가 요구사항을 충족하지 않음 (서버 기동 불가)
    #[error("키 길이가 올바르지 않습니다: {expected}, 실제 {actual}바이트")]
    WeakKey { expected: String, actual: usize },

    /// 토큰 ID 생성 또는 봉인 실패
    #[error("토큰 생성 실패: {0}")]
    KeyGeneration(String),

    /// 유효하지 않은 토큰
    #[error("유효하지 않은 토큰")]
    InvalidToken,
}

/// 토큰 백엔드 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// HMAC 서명 (JWT)
    #[default]
    Signed,
    /// AES-256-GCM 봉인
    Sealed,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Signed => write!(f, "signed"),
            Self::Sealed => write!(f, "sealed"),
        }
    }
}

impl std::str::FromStr for TokenKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "signed" | "jwt" => Ok(Self::Signed),
            "sealed" | "aead" => Ok(Self::Sealed),
            _ => Err(format!("Unknown token kind: {}", s)),
        }
    }
}

/// 토큰 발급/검증 계약.
///
/// 구현체는 불변 키 하나 외에는 상태가 없어야 하며,
/// 하나의 인스턴스를 여러 요청에서 동시에 공유할 수 있어야 합니다.
pub trait TokenMaker: Send + Sync {
    /// 백엔드 종류.
    fn kind(&self) -> TokenKind;

    /// 주어진 시각을 발급 시각으로 토큰 생성.
    fn create_token_at(
        &self,
        username: &str,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<(String, Payload), TokenError>;

    /// 주어진 시각 기준으로 토큰 검증.
    fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Payload, TokenError>;

    /// 토큰 생성.
    ///
    /// # Returns
    ///
    /// `(토큰 문자열, 페이로드)`
    fn create_token(&self, username: &str, duration: Duration) -> Result<(String, Payload), TokenError> {
        self.create_token_at(username, duration, Utc::now())
    }

    /// 토큰 검증.
    fn verify_token(&self, token: &str) -> Result<Payload, TokenError> {
        self.verify_token_at(token, Utc::now())
    }
}

/// 설정에 따라 토큰 발급기를 생성합니다.
///
/// 키 길이가 맞지 않으면 [`TokenError::WeakKey`]를 반환하며, 이 경우 서버는 기동하면 안 됩니다.
pub fn build_token_maker(config: &TokenConfig) -> Result<Arc<dyn TokenMaker>, TokenError> {
    let key = config.symmetric_key.expose_secret().as_bytes();

    let maker: Arc<dyn TokenMaker> = match config.kind {
        TokenKind::Signed => Arc::new(JwtMaker::new(key)?),
        TokenKind::Sealed => Arc::new(SealedMaker::new(key)?),
    };

    tracing::info!(kind = %maker.kind(), "Token maker initialized");
    Ok(maker)
}

/// 검증 실패를 기록하고 호출자에게 노출할 에러로 변환합니다.
pub(crate) fn reject(kind: TokenKind, reason: &str) -> TokenError {
    tracing::debug!(kind = %kind, reason, "Token verification failed");
    TokenError::InvalidToken
}
