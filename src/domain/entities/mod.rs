//! 핵심 도메인 엔티티

pub mod session_user;

pub use session_user::*;
