//! 에러 처리 모듈
//!
//! [`errors::ApiError`]와 [`errors::ApiResult`]를 제공합니다.

pub mod errors;

pub use errors::*;
