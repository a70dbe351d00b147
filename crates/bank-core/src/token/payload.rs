//! 토큰에 담기는 신원 클레임.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TokenError;

/// 토큰 페이로드.
///
/// `create_token` 안에서만 생성되고, `verify_token`에서 다시 복원됩니다.
/// 생성 후에는 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// 토큰 고유 식별자 (UUID v4). 외부 세션 레코드와 연결하는 키
    pub id: Uuid,
    /// 토큰 주체 사용자 이름
    pub username: String,
    /// 발급 시각 (초 단위로 절사)
    pub issued_at: DateTime<Utc>,
    /// 만료 시각
    pub expires_at: DateTime<Utc>,
}

/// 페이로드 유효성 검사 실패 사유.
///
/// 내부 로그 전용입니다. 호출자에게는 항상 `InvalidToken`으로만 전달됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidityViolation {
    /// 발급 시각이 현재보다 미래
    IssuedInFuture,
    /// 만료 시각이 발급 시각보다 늦지 않음
    NonPositiveLifetime,
    /// 만료됨
    Expired,
}

impl ValidityViolation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IssuedInFuture => "issued_in_future",
            Self::NonPositiveLifetime => "non_positive_lifetime",
            Self::Expired => "expired",
        }
    }
}

impl Payload {
    /// 새 페이로드 생성.
    ///
    /// 시각은 초 단위로 절사되어 두 백엔드 모두에서 왕복 후 동일한 값을 가집니다.
    /// 만료 시각이 표현 가능한 범위를 벗어나면 [`TokenError::KeyGeneration`]을 반환합니다.
    ///
    /// # Arguments
    ///
    /// * `id` - 고유 식별자
    /// * `username` - 사용자 이름
    /// * `duration` - 유효 기간
    /// * `now` - 발급 시각
    pub fn new(
        id: Uuid,
        username: impl Into<String>,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<Self, TokenError> {
        let issued_at = now.trunc_subsecs(0);
        let expires_at = issued_at.checked_add_signed(duration).ok_or_else(|| {
            TokenError::KeyGeneration(format!("유효 기간이 범위를 벗어났습니다: {}초", duration.num_seconds()))
        })?;

        Ok(Self {
            id,
            username: username.into(),
            issued_at,
            expires_at,
        })
    }

    /// 주어진 시각 기준 유효성 검사.
    ///
    /// 시계 오차는 허용하지 않습니다. `now == expires_at`까지는 유효합니다.
    pub fn check_validity(&self, now: DateTime<Utc>) -> Result<(), ValidityViolation> {
        if self.expires_at <= self.issued_at {
            return Err(ValidityViolation::NonPositiveLifetime);
        }
        if self.issued_at > now {
            return Err(ValidityViolation::IssuedInFuture);
        }
        if now > self.expires_at {
            return Err(ValidityViolation::Expired);
        }
        Ok(())
    }
}
