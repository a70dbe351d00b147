//! 인증 API 서버.
//!
//! 설정을 로드하고 토큰 발급기를 구성한 뒤 Axum 서버를 시작합니다.
//! 키 길이나 유효 기간 설정이 잘못되면 서버는 시작하지 않습니다.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use bank_api::routes::create_api_router;
use bank_api::state::AppState;
use bank_core::{build_token_maker, init_logging, AppConfig, BankResult, LogConfig};

/// 설정 파일 경로를 지정하는 환경 변수
const CONFIG_PATH_ENV: &str = "BANK_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let (config, state) = bootstrap()?;
    let app = create_api_router(Arc::new(state)).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("잘못된 서버 주소")?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, kind = %config.token.kind, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

/// 설정, 로깅, 토큰 발급기를 준비합니다.
///
/// 치명적이지 않은 에러는 경고만 남기고 계속 진행합니다.
fn bootstrap() -> BankResult<(AppConfig, AppState)> {
    let config = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => AppConfig::load(path)?,
        Err(_) => AppConfig::load_default()?,
    };

    if let Err(e) = init_logging(LogConfig::try_from(&config.logging)?) {
        if e.is_fatal() {
            return Err(e);
        }
        warn!(error = %e, "Continuing with the existing log subscriber");
    }

    let token_maker = build_token_maker(&config.token)
        .inspect_err(|e| error!(error = %e, "Refusing to start with invalid token key"))?;
    let state = AppState::new(token_maker, &config.token)?;

    Ok((config, state))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}
