//! 인증 도메인 모델
//!
//! - [`credentials`] - 자격 증명 표현과 백엔드 응답 해석 규칙
//! - [`auth_flags`] - 세션에서 파생된 역할 기반 권한 플래그

pub mod auth_flags;
pub mod credentials;

pub use auth_flags::*;
pub use credentials::*;
