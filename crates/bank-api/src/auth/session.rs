//! 세션 레코드.
//!
//! 저장은 외부 저장소가 담당합니다. 여기서는 레코드 형태와
//! Refresh Token 재사용 시 대조 규칙만 정의합니다.

use bank_core::Payload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::grpc::CallMetadata;

/// 로그인 세션 레코드.
///
/// `id`는 Refresh Token 페이로드의 ID와 같습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub username: String,
    pub refresh_token: String,
    pub user_agent: String,
    pub client_ip: String,
    /// 차단(폐기) 여부
    pub is_blocked: bool,
    pub expires_at: DateTime<Utc>,
}

/// 세션 대조 실패.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("차단된 세션입니다")]
    Blocked,
    #[error("세션 사용자가 일치하지 않습니다")]
    UserMismatch,
    #[error("세션 토큰이 일치하지 않습니다")]
    TokenMismatch,
    #[error("만료된 세션입니다")]
    Expired,
}

impl SessionRecord {
    /// Refresh Token 발급 결과로 세션 레코드 생성.
    pub fn new(refresh_token: String, refresh_payload: &Payload, metadata: CallMetadata) -> Self {
        Self {
            id: refresh_payload.id,
            username: refresh_payload.username.clone(),
            refresh_token,
            user_agent: metadata.user_agent,
            client_ip: metadata.client_ip,
            is_blocked: false,
            expires_at: refresh_payload.expires_at,
        }
    }

    /// 검증된 Refresh Token이 이 세션에 속하고 아직 사용 가능한지 확인합니다.
    pub fn check_refresh(
        &self,
        refresh_token: &str,
        payload: &Payload,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if self.is_blocked {
            return Err(SessionError::Blocked);
        }
        if self.username != payload.username {
            return Err(SessionError::UserMismatch);
        }
        if self.id != payload.id || self.refresh_token != refresh_token {
            return Err(SessionError::TokenMismatch);
        }
        if now > self.expires_at {
            return Err(SessionError::Expired);
        }
        Ok(())
    }
}
