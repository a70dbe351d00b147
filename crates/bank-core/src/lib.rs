//! # Bank Core
//!
//! 베어러 토큰 인증의 핵심 타입을 제공합니다:
//! - 토큰 페이로드와 발급/검증 계약 ([`token::TokenMaker`])
//! - HMAC 서명(JWT) 및 AES-256-GCM 봉인 백엔드
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod error;
pub mod logging;
pub mod token;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use token::{
    build_token_maker, JwtMaker, Payload, SealedMaker, TokenError, TokenKind, TokenMaker,
};
