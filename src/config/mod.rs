//! # Configuration Module
//!
//! 클라이언트 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값들을 중앙집중식으로 읽고,
//! 주입 가능한 [`ClientSettings`] 구조체로 구체화합니다.
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 원격 API 주소 (기본값: http://127.0.0.1:8000)
//! export API_BASE_URL="https://api.mediscope.example"
//!
//! # 요청 타임아웃 (초, 미설정 시 타임아웃 없음)
//! export API_TIMEOUT_SECS="30"
//!
//! # 세션 저장소
//! export SESSION_STORAGE_DIR=".mediscope"
//! export TOKENS_STORAGE_KEY="tokens"
//! export USER_STORAGE_KEY="auth_user"
//! ```
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use mediscope_client::config::{ApiConfig, ClientSettings};
//!
//! let settings = ClientSettings::from_env()?;
//! println!("API: {}", settings.base_url());
//! println!("세션 디렉터리: {:?}", ApiConfig::storage_dir());
//! ```

pub mod api_config;

pub use api_config::*;
