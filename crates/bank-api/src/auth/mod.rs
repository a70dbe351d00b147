//! 인증 및 권한 부여.
//!
//! # 구성 요소
//!
//! - [`authorize_http`]: Authorization 헤더에서 베어러 토큰 추출 및 검증
//! - [`require_auth`] / [`protect`]: 보호된 라우트용 Axum 미들웨어
//! - [`AuthPayload`]: 인증된 페이로드 추출기
//! - [`LoginService`]: 로그인 시 Access/Refresh Token 발급
//! - [`SessionRecord`]: 외부 저장소에 기록할 세션 형태
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn protected_handler(AuthPayload(payload): AuthPayload) -> impl IntoResponse {
//!     format!("Hello, {}!", payload.username)
//! }
//! ```

mod authorization;
mod error;
pub mod login;
mod middleware;
pub mod password;
pub mod session;

pub use authorization::{authorize_http, parse_authorization, AUTHORIZATION_KEY, BEARER_SCHEME};
pub(crate) use authorization::verify_authorization;
pub use error::AuthError;
pub use login::{LoginError, LoginRequest, LoginResponse, LoginService, UserCredentials};
pub use middleware::{protect, require_auth, AuthPayload};
pub use password::{hash_password, verify_password, PasswordError};
pub use session::{SessionError, SessionRecord};
