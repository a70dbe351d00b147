//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (공개)
//! - `/api/v1/me` - 인증된 호출자 정보 (베어러 토큰 필요)

pub mod health;
pub mod me;

use std::sync::Arc;

use axum::Router;

use crate::auth::protect;
use crate::state::AppState;

pub use health::{health_router, HealthResponse};
pub use me::{me_router, MeResponse};

/// 전체 API 라우터 생성.
///
/// `/api/v1` 아래 라우트는 모두 인증 미들웨어를 거칩니다.
pub fn create_api_router(state: Arc<AppState>) -> Router {
    let protected = protect(me_router(), state.token_maker.clone());

    Router::new()
        .merge(health_router())
        .nest("/api/v1", protected)
        .with_state(state)
}
