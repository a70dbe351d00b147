//! 인증된 호출자 정보 endpoint.

use axum::{response::IntoResponse, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::AuthPayload;
use crate::state::AppState;

/// 현재 사용자 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub username: String,
    pub token_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// GET /api/v1/me
pub async fn get_me(AuthPayload(payload): AuthPayload) -> impl IntoResponse {
    Json(MeResponse {
        username: payload.username,
        token_id: payload.id.to_string(),
        issued_at: payload.issued_at,
        expires_at: payload.expires_at,
    })
}

pub fn me_router() -> Router<Arc<AppState>> {
    Router::new().route("/me", get(get_me))
}
