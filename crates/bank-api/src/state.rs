//! 모든 핸들러에서 공유되는 애플리케이션 상태.

use std::sync::Arc;

use bank_core::{BankResult, TokenConfig, TokenMaker};
use chrono::{DateTime, Utc};

use crate::auth::LoginService;

/// 애플리케이션 공유 상태.
///
/// 토큰 발급기는 불변 키만 가지므로 잠금 없이 모든 요청에서 공유합니다.
#[derive(Clone)]
pub struct AppState {
    /// 토큰 발급/검증기
    pub token_maker: Arc<dyn TokenMaker>,
    /// 로그인/갱신 토큰 발급 (같은 토큰 발급기 공유)
    pub login: LoginService,
    /// 서버 시작 시간
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// 토큰 발급기와 유효 기간 설정으로 상태 생성.
    ///
    /// 유효 기간 설정이 잘못되면 에러를 반환합니다.
    pub fn new(token_maker: Arc<dyn TokenMaker>, config: &TokenConfig) -> BankResult<Self> {
        let login = LoginService::new(token_maker.clone(), config)?;
        Ok(Self {
            token_maker,
            login,
            started_at: Utc::now(),
        })
    }

    /// 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

/// 테스트용 상태 생성.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    let maker = bank_core::JwtMaker::new(b"test-state-secret-key-at-least-32-bytes")
        .expect("test key is long enough");
    AppState::new(Arc::new(maker), &TokenConfig::default())
        .expect("default durations are valid")
}
