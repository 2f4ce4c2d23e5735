//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 도메인별로 모듈화되어 원격 API 호출과 세션 상태 관리를 담당합니다.
//! 전역 싱글톤 없이 애플리케이션 시작 시 명시적으로 생성해 주입합니다.
//!
//! # Features
//!
//! - bearer 자격 증명 자동 부착과 401 이후 단일 비행 토큰 갱신
//! - 요청 로딩 카운터와 공유 마지막 에러
//! - 로그인/환자 회원가입/로그아웃과 역할 기반 권한 플래그
//!
//! # Examples
//!
//! ```rust,ignore
//! use mediscope_client::services::{client::ApiClient, session::SessionState};
//!
//! let api = ApiClient::with_reqwest(settings, storage)?;
//! let session = SessionState::new(api.clone());
//! ```

pub mod client;
pub mod session;
