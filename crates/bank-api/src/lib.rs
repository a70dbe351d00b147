//! HTTP 및 gRPC 요청 인증.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 인증 미들웨어와 인증된 페이로드 추출기
//! - gRPC 메타데이터 인증 및 인터셉터
//! - 로그인 토큰 발급과 세션 레코드
//! - 헬스 체크 및 호출자 정보 엔드포인트
//!
//! # 모듈 구성
//!
//! - [`auth`]: 베어러 토큰 추출, 미들웨어, 로그인
//! - [`grpc`]: gRPC 인증 및 호출자 메타데이터
//! - [`routes`]: REST API 엔드포인트
//! - [`state`]: 애플리케이션 공유 상태

pub mod auth;
pub mod error;
pub mod grpc;
pub mod routes;
pub mod state;

pub use auth::{authorize_http, protect, require_auth, AuthError, AuthPayload, LoginService};
pub use error::{error_response, ErrorBody};
pub use grpc::{authorize, ensure_same_user, unauthenticated_error, AuthInterceptor, AuthPayloadExt};
pub use routes::create_api_router;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
