//! 데이터 전송 객체 (Request/Response)
//!
//! 인증 엔드포인트와 주고받는 본문의 형태를 정의합니다.
//! 그 외 리소스(`/analyses/`, `/notes/` 등)의 형태는 이 크레이트가 해석하지 않습니다.

pub mod auth_request;
pub mod auth_response;

pub use auth_request::*;
pub use auth_response::*;
