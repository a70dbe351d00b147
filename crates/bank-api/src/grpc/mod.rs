//! gRPC 요청 인증.
//!
//! 보호된 RPC 메서드는 시작 시점에 [`authorize`]를 호출하거나,
//! 서비스 전체에 [`AuthInterceptor`]를 적용합니다.
//!
//! ```rust,ignore
//! async fn update_user(&self, request: Request<UpdateUserRequest>) -> Result<Response<_>, Status> {
//!     let payload = authorize(self.maker.as_ref(), &request).map_err(unauthenticated_error)?;
//!     ensure_same_user(&payload, &request.get_ref().username)?;
//!     ...
//! }
//! ```

pub mod metadata;

use std::sync::Arc;

use bank_core::{Payload, TokenMaker};
use tonic::{metadata::MetadataMap, service::Interceptor, Request, Status};

use crate::auth::{verify_authorization, AuthError, AUTHORIZATION_KEY};

pub use metadata::{extract_call_metadata, CallMetadata};

/// 메타데이터에서 베어러 토큰을 추출해 검증합니다.
///
/// # Errors
///
/// - 메타데이터 없음(또는 항목이 하나도 없음): [`AuthError::MissingMetadata`]
/// - `authorization` 값 없음: [`AuthError::MissingCredential`]
/// - 이후 규칙은 HTTP 헤더와 동일
pub fn authorize_metadata(
    maker: &dyn TokenMaker,
    metadata: Option<&MetadataMap>,
) -> Result<Payload, AuthError> {
    let metadata = metadata
        .filter(|md| !md.is_empty())
        .ok_or(AuthError::MissingMetadata)?;

    let value = metadata
        .get(AUTHORIZATION_KEY)
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    verify_authorization(maker, value)
}

/// 요청 메타데이터로 호출자를 인증합니다.
pub fn authorize<T>(maker: &dyn TokenMaker, request: &Request<T>) -> Result<Payload, AuthError> {
    authorize_metadata(maker, Some(request.metadata()))
}

/// 인증 실패를 `Unauthenticated` 상태로 변환합니다.
pub fn unauthenticated_error(err: AuthError) -> Status {
    tracing::debug!(code = err.code(), "RPC call rejected");
    Status::from(err)
}

/// 인증된 주체와 요청 대상 사용자가 같은지 확인합니다.
///
/// 다르면 `PermissionDenied` (인증은 되었으나 권한 없음).
pub fn ensure_same_user(payload: &Payload, username: &str) -> Result<(), Status> {
    if payload.username == username {
        Ok(())
    } else {
        Err(Status::permission_denied("다른 사용자의 정보는 변경할 수 없습니다"))
    }
}

/// 모든 호출에 인증을 적용하는 인터셉터.
///
/// 성공하면 [`Payload`]를 요청 extensions에 저장합니다.
#[derive(Clone)]
pub struct AuthInterceptor {
    maker: Arc<dyn TokenMaker>,
}

impl AuthInterceptor {
    pub fn new(maker: Arc<dyn TokenMaker>) -> Self {
        Self { maker }
    }
}

impl Interceptor for AuthInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        let payload = authorize(self.maker.as_ref(), &request).map_err(unauthenticated_error)?;
        request.extensions_mut().insert(payload);
        Ok(request)
    }
}

/// 인터셉터가 저장한 페이로드 조회.
pub trait AuthPayloadExt {
    /// 인증된 페이로드. 인터셉터가 적용되지 않았으면 `Unauthenticated`.
    fn auth_payload(&self) -> Result<&Payload, Status>;
}

impl<T> AuthPayloadExt for Request<T> {
    fn auth_payload(&self) -> Result<&Payload, Status> {
        self.extensions()
            .get::<Payload>()
            .ok_or_else(|| Status::unauthenticated(AuthError::MissingCredential.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bank_core::{JwtMaker, SealedMaker};
    use chrono::Duration;
    use tonic::{metadata::AsciiMetadataKey, Code};

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn makers() -> Vec<Arc<dyn TokenMaker>> {
        vec![
            Arc::new(JwtMaker::new(SECRET).unwrap()),
            Arc::new(SealedMaker::new(SECRET).unwrap()),
        ]
    }

    fn request_with(key: &str, value: &str) -> Request<()> {
        let mut request = Request::new(());
        request.metadata_mut().insert(
            AsciiMetadataKey::from_bytes(key.as_bytes()).unwrap(),
            value.parse().unwrap(),
        );
        request
    }

    #[test]
    fn test_authorize_valid_token() {
        for maker in makers() {
            let (token, payload) = maker.create_token("alice", Duration::minutes(1)).unwrap();
            let request = request_with("authorization", &format!("Bearer {}", token));

            assert_eq!(authorize(maker.as_ref(), &request), Ok(payload));
        }
    }

    #[test]
    fn test_authorize_missing_metadata() {
        let maker = JwtMaker::new(SECRET).unwrap();

        assert_eq!(
            authorize_metadata(&maker, None),
            Err(AuthError::MissingMetadata)
        );
        assert_eq!(
            authorize(&maker, &Request::new(())),
            Err(AuthError::MissingMetadata)
        );
    }

    #[test]
    fn test_authorize_missing_credential() {
        let maker = JwtMaker::new(SECRET).unwrap();
        let request = request_with("user-agent", "grpc-test/1.0");

        assert_eq!(authorize(&maker, &request), Err(AuthError::MissingCredential));
    }

    #[test]
    fn test_authorize_classifies_header_errors() {
        let maker = JwtMaker::new(SECRET).unwrap();

        let cases = [
            ("Bearer", AuthError::MalformedHeader),
            ("Basic abc", AuthError::UnsupportedScheme),
            ("bearer invalid.token.here", AuthError::InvalidToken),
        ];
        for (value, expected) in cases {
            let request = request_with("authorization", value);
            assert_eq!(authorize(&maker, &request), Err(expected), "value: {}", value);
        }
    }

    #[test]
    fn test_expired_token_unauthenticated() {
        let maker = SealedMaker::new(SECRET).unwrap();
        let (token, _) = maker.create_token("alice", -Duration::minutes(1)).unwrap();
        let request = request_with("authorization", &format!("Bearer {}", token));

        let status = authorize(&maker, &request).map_err(unauthenticated_error).unwrap_err();
        assert_eq!(status.code(), Code::Unauthenticated);
    }

    #[test]
    fn test_interceptor_stores_payload() {
        let maker: Arc<dyn TokenMaker> = Arc::new(JwtMaker::new(SECRET).unwrap());
        let (token, payload) = maker.create_token("alice", Duration::minutes(1)).unwrap();
        let mut interceptor = AuthInterceptor::new(maker);

        let request = interceptor
            .call(request_with("authorization", &format!("Bearer {}", token)))
            .unwrap();
        assert_eq!(request.auth_payload().unwrap(), &payload);
    }

    #[test]
    fn test_interceptor_rejects() {
        let maker: Arc<dyn TokenMaker> = Arc::new(JwtMaker::new(SECRET).unwrap());
        let mut interceptor = AuthInterceptor::new(maker);

        let status = interceptor
            .call(request_with("authorization", "Basic abc"))
            .unwrap_err();
        assert_eq!(status.code(), Code::Unauthenticated);
    }

    #[test]
    fn test_auth_payload_without_interceptor() {
        let status = Request::new(()).auth_payload().unwrap_err();
        assert_eq!(status.code(), Code::Unauthenticated);
    }

    #[test]
    fn test_ensure_same_user() {
        let maker = JwtMaker::new(SECRET).unwrap();
        let (_, payload) = maker.create_token("alice", Duration::minutes(1)).unwrap();

        assert!(ensure_same_user(&payload, "alice").is_ok());

        let status = ensure_same_user(&payload, "bob").unwrap_err();
        assert_eq!(status.code(), Code::PermissionDenied);
    }
}
