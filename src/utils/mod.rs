//! 공통 유틸리티 함수 모듈
//!
//! 애플리케이션 전체에서 사용되는 공통 유틸리티 함수들을 제공합니다.
//!
//! # Modules
//!
//! - [`error_message`] - 에러 응답 본문에서 사용자용 메시지 추출
//! - [`display_terminal`] - CLI 출력 포맷팅 함수들
//!
//! # Examples
//!
//! ```rust,ignore
//! use mediscope_client::utils::error_message::extract_error_message;
//!
//! let body = serde_json::json!({"detail": "Not found."});
//! assert_eq!(extract_error_message(&body).as_deref(), Some("Not found."));
//! ```

pub mod error_message;
pub mod display_terminal;
