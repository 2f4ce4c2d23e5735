//! 세션/권한 상태 모듈

pub mod session_service;

pub use session_service::{SessionPhase, SessionSnapshot, SessionState};
