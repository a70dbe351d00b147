//! 라우터 전체를 통과하는 인증 흐름 테스트.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header::AUTHORIZATION, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use tower::ServiceExt;

use bank_api::routes::{create_api_router, MeResponse};
use bank_api::state::AppState;
use bank_core::{JwtMaker, SealedMaker, TokenConfig, TokenMaker};

const SIGNED_KEY: &[u8] = b"integration-signing-key-0123456789abcdef";
const SEALED_KEY: &[u8] = b"0123456789abcdef0123456789abcdef";

fn makers() -> Vec<Arc<dyn TokenMaker>> {
    vec![
        Arc::new(JwtMaker::new(SIGNED_KEY).unwrap()),
        Arc::new(SealedMaker::new(SEALED_KEY).unwrap()),
    ]
}

fn app(maker: Arc<dyn TokenMaker>) -> Router {
    let state = AppState::new(maker, &TokenConfig::default()).unwrap();
    create_api_router(Arc::new(state))
}

async fn get_me(app: Router, authorization: Option<&str>) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().uri("/api/v1/me");
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn fresh_token_reaches_handler() {
    for maker in makers() {
        let (token, payload) = maker.create_token("alice", Duration::minutes(1)).unwrap();

        let (status, json) = get_me(app(maker), Some(&format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::OK);
        let me: MeResponse = serde_json::from_value(json).unwrap();
        assert_eq!(me.username, "alice");
        assert_eq!(me.token_id, payload.id.to_string());
        assert_eq!(me.expires_at, payload.expires_at);
    }
}

#[tokio::test]
async fn scheme_is_case_insensitive() {
    for maker in makers() {
        let (token, _) = maker.create_token("alice", Duration::minutes(1)).unwrap();

        let (status, _) = get_me(app(maker), Some(&format!("bEaReR {}", token))).await;

        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn token_issued_61_seconds_ago_with_one_minute_lifetime_is_rejected() {
    for maker in makers() {
        let issued = Utc::now() - Duration::seconds(61);
        let (token, _) = maker
            .create_token_at("alice", Duration::minutes(1), issued)
            .unwrap();

        let (status, json) = get_me(app(maker), Some(&format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(json["error"].is_string());
    }
}

#[tokio::test]
async fn malformed_headers_are_rejected_with_error_body() {
    let cases = [None, Some("Bearer"), Some("Basic abc"), Some("Bearer a b"), Some("")];

    for maker in makers() {
        for case in cases {
            let (status, json) = get_me(app(maker.clone()), case).await;

            assert_eq!(status, StatusCode::UNAUTHORIZED, "header: {:?}", case);
            assert!(json["error"].is_string(), "header: {:?}", case);
        }
    }
}

#[tokio::test]
async fn token_from_other_backend_is_rejected() {
    let signed: Arc<dyn TokenMaker> = Arc::new(JwtMaker::new(SIGNED_KEY).unwrap());
    let sealed: Arc<dyn TokenMaker> = Arc::new(SealedMaker::new(SEALED_KEY).unwrap());

    let (signed_token, _) = signed.create_token("alice", Duration::minutes(1)).unwrap();
    let (sealed_token, _) = sealed.create_token("alice", Duration::minutes(1)).unwrap();

    let (status, _) = get_me(app(sealed), Some(&format!("Bearer {}", signed_token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = get_me(app(signed), Some(&format!("Bearer {}", sealed_token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_public() {
    for maker in makers() {
        let kind = maker.kind().to_string();
        let response = app(maker)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["token_kind"], kind);
    }
}
