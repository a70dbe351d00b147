//! Axum용 인증 미들웨어.
//!
//! 보호된 라우트 앞에서 베어러 토큰을 검증하고,
//! 성공하면 [`Payload`]를 요청 extensions에 저장합니다.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use bank_core::{Payload, TokenMaker};

use super::authorize_http;
use crate::error::error_response;

/// 인증 미들웨어 함수.
///
/// 실패 시 핸들러를 호출하지 않고 즉시 401 응답을 반환합니다.
pub async fn require_auth(
    State(maker): State<Arc<dyn TokenMaker>>,
    mut request: Request,
    next: Next,
) -> Response {
    match authorize_http(maker.as_ref(), request.headers()) {
        Ok(payload) => {
            tracing::debug!(
                username = %payload.username,
                token_id = %payload.id,
                "Request authenticated"
            );
            request.extensions_mut().insert(payload);
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(
                code = err.code(),
                method = %request.method(),
                path = %request.uri().path(),
                "Request rejected"
            );
            err.into_response()
        }
    }
}

/// 라우터의 모든 라우트에 인증을 적용합니다.
///
/// # 사용 예시
///
/// ```rust,ignore
/// let protected = protect(Router::new().route("/me", get(me)), maker.clone());
/// ```
pub fn protect<S>(router: Router<S>, maker: Arc<dyn TokenMaker>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(maker, require_auth))
}

/// 인증된 사용자 추출기.
///
/// [`require_auth`]가 적용된 라우트에서만 사용할 수 있습니다.
///
/// ```rust,ignore
/// async fn me(AuthPayload(payload): AuthPayload) -> impl IntoResponse {
///     format!("Hello, {}!", payload.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthPayload(pub Payload);

impl<S> FromRequestParts<S> for AuthPayload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Payload>()
            .cloned()
            .map(AuthPayload)
            .ok_or_else(|| {
                tracing::error!("AuthPayload used on a route without require_auth");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "인증 미들웨어가 설정되지 않았습니다")
            })
    }
}
