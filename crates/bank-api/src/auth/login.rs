//! 로그인 및 Access Token 갱신.
//!
//! 사용자 조회와 세션 저장은 호출자가 외부 저장소로 수행합니다.
//! 이 모듈은 요청 검증, 비밀번호 대조, 토큰 발급, 세션 레코드 생성을 담당합니다.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bank_core::{BankResult, TokenConfig, TokenError, TokenMaker};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tonic::Status;
use validator::{Validate, ValidationError, ValidationErrors};

use super::password::{verify_password, PasswordError};
use super::session::{SessionError, SessionRecord};
use crate::error::error_response;
use crate::grpc::CallMetadata;

/// 로그인 요청.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// 사용자 이름 (영문, 숫자, 밑줄만 허용)
    #[validate(
        length(min = 3, max = 100, message = "사용자 이름은 3-100자여야 합니다"),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(length(min = 3, max = 100, message = "비밀번호는 3-100자여야 합니다"))]
    pub password: String,
}

fn validate_username(value: &str) -> Result<(), ValidationError> {
    if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::new("invalid_username")
            .with_message("사용자 이름은 영문, 숫자, 밑줄만 사용할 수 있습니다".into()));
    }
    Ok(())
}

/// 외부 저장소에서 조회한 사용자 자격 정보.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub username: String,
    /// Argon2 PHC 해시
    pub hashed_password: String,
}

/// 로그인 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub session_id: String,
    pub username: String,
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_token_expires_at: DateTime<Utc>,
}

/// 로그인 결과. `session`은 호출자가 외부 저장소에 기록합니다.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub response: LoginResponse,
    pub session: SessionRecord,
}

/// 갱신된 Access Token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenewedAccessToken {
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
}

/// 로그인 에러.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("잘못된 요청: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("사용자 이름 또는 비밀번호가 올바르지 않습니다")]
    InvalidCredentials,
    #[error("토큰 생성 실패")]
    TokenCreation(#[source] TokenError),
    #[error("유효하지 않은 토큰")]
    InvalidToken,
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl LoginError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LoginError::Validation(_) => StatusCode::BAD_REQUEST,
            LoginError::TokenCreation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LoginError::InvalidCredentials | LoginError::InvalidToken | LoginError::Session(_) => {
                StatusCode::UNAUTHORIZED
            }
        }
    }
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.to_string())
    }
}

impl From<LoginError> for Status {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::Validation(e) => Status::invalid_argument(e.to_string()),
            LoginError::TokenCreation(_) => Status::internal("토큰 생성 실패"),
            other => Status::unauthenticated(other.to_string()),
        }
    }
}

/// 토큰 발급 서비스.
#[derive(Clone)]
pub struct LoginService {
    maker: Arc<dyn TokenMaker>,
    access_token_duration: Duration,
    refresh_token_duration: Duration,
}

impl LoginService {
    /// 설정된 유효 기간으로 서비스 생성.
    pub fn new(maker: Arc<dyn TokenMaker>, config: &TokenConfig) -> BankResult<Self> {
        Ok(Self::with_durations(
            maker,
            config.access_token_duration()?,
            config.refresh_token_duration()?,
        ))
    }

    pub fn with_durations(
        maker: Arc<dyn TokenMaker>,
        access_token_duration: Duration,
        refresh_token_duration: Duration,
    ) -> Self {
        Self {
            maker,
            access_token_duration,
            refresh_token_duration,
        }
    }

    /// 로그인 처리.
    ///
    /// # Arguments
    ///
    /// * `request` - 로그인 요청
    /// * `user` - 요청한 사용자 이름으로 조회한 자격 정보
    /// * `metadata` - 세션에 기록할 호출자 정보
    pub fn login(
        &self,
        request: &LoginRequest,
        user: &UserCredentials,
        metadata: CallMetadata,
    ) -> Result<LoginOutcome, LoginError> {
        request.validate()?;

        if user.username != request.username {
            return Err(LoginError::InvalidCredentials);
        }

        verify_password(&request.password, &user.hashed_password).map_err(|e| {
            if let PasswordError::InvalidHashFormat = e {
                tracing::error!(username = %user.username, "Stored password hash is malformed");
            }
            LoginError::InvalidCredentials
        })?;

        let (access_token, access_payload) = self
            .maker
            .create_token(&user.username, self.access_token_duration)
            .map_err(LoginError::TokenCreation)?;
        let (refresh_token, refresh_payload) = self
            .maker
            .create_token(&user.username, self.refresh_token_duration)
            .map_err(LoginError::TokenCreation)?;

        let session = SessionRecord::new(refresh_token.clone(), &refresh_payload, metadata);

        tracing::info!(
            username = %user.username,
            session_id = %session.id,
            "User logged in"
        );

        Ok(LoginOutcome {
            response: LoginResponse {
                session_id: session.id.to_string(),
                username: user.username.clone(),
                access_token,
                access_token_expires_at: access_payload.expires_at,
                refresh_token,
                refresh_token_expires_at: refresh_payload.expires_at,
            },
            session,
        })
    }

    /// Refresh Token으로 새 Access Token 발급.
    ///
    /// `session`은 Refresh Token 페이로드 ID로 외부 저장소에서 조회한 레코드입니다.
    pub fn renew_access_token(
        &self,
        refresh_token: &str,
        session: &SessionRecord,
    ) -> Result<RenewedAccessToken, LoginError> {
        let now = Utc::now();
        let payload = self
            .maker
            .verify_token_at(refresh_token, now)
            .map_err(|_| LoginError::InvalidToken)?;

        session.check_refresh(refresh_token, &payload, now)?;

        let (access_token, access_payload) = self
            .maker
            .create_token_at(&payload.username, self.access_token_duration, now)
            .map_err(LoginError::TokenCreation)?;

        Ok(RenewedAccessToken {
            access_token,
            access_token_expires_at: access_payload.expires_at,
        })
    }
}
