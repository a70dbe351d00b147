//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.

use chrono::Duration;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::token::TokenKind;

/// 기본 설정 파일 경로
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 애플리케이션 설정.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 토큰 설정
    pub token: TokenConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 토큰 설정.
///
/// 대칭 키는 로그에 남지 않도록 [`SecretString`]으로 보관합니다.
#[derive(Debug, Deserialize)]
pub struct TokenConfig {
    /// 백엔드 종류 (signed, sealed)
    #[serde(default)]
    pub kind: TokenKind,
    /// 대칭 키 (signed: 32바이트 이상, sealed: 정확히 32바이트)
    pub symmetric_key: SecretString,
    /// Access Token 유효 기간 (초)
    #[serde(default = "default_access_token_duration")]
    pub access_token_duration_secs: i64,
    /// Refresh Token 유효 기간 (초)
    #[serde(default = "default_refresh_token_duration")]
    pub refresh_token_duration_secs: i64,
}

fn default_access_token_duration() -> i64 {
    15 * 60
}
fn default_refresh_token_duration() -> i64 {
    24 * 60 * 60
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            kind: TokenKind::default(),
            symmetric_key: SecretString::from(String::new()),
            access_token_duration_secs: default_access_token_duration(),
            refresh_token_duration_secs: default_refresh_token_duration(),
        }
    }
}

impl TokenConfig {
    /// Access Token 유효 기간.
    pub fn access_token_duration(&self) -> Result<Duration, config::ConfigError> {
        lifetime("token.access_token_duration_secs", self.access_token_duration_secs)
    }

    /// Refresh Token 유효 기간.
    pub fn refresh_token_duration(&self) -> Result<Duration, config::ConfigError> {
        lifetime("token.refresh_token_duration_secs", self.refresh_token_duration_secs)
    }

    /// 유효 기간 설정 검증.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        self.access_token_duration()?;
        self.refresh_token_duration()?;
        Ok(())
    }
}

/// 초 단위 설정값을 유효 기간으로 변환합니다. 0 이하이거나 표현 범위를 벗어나면 에러.
fn lifetime(key: &str, secs: i64) -> Result<Duration, config::ConfigError> {
    if secs <= 0 {
        return Err(config::ConfigError::Message(format!(
            "{}는 양수여야 합니다: {}",
            key, secs
        )));
    }
    Duration::try_seconds(secs).ok_or_else(|| {
        config::ConfigError::Message(format!("{}가 범위를 벗어났습니다: {}", key, secs))
    })
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 환경 변수는 `BANK__TOKEN__SYMMETRIC_KEY`처럼 `__`로 구분합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("token.kind", "signed")?
            // 파일에서 로드 (없어도 됨)
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("BANK")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.token.validate()?;
        Ok(config)
    }

    /// 기본 경로([`DEFAULT_CONFIG_PATH`])에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load(DEFAULT_CONFIG_PATH)
    }
}
