//! # Domain Layer Module
//!
//! 인증 파이프라인이 다루는 값 타입을 정의하는 계층입니다.
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── Entities  - 세션 사용자와 역할
//! ├── DTOs      - 인증 엔드포인트 요청/응답 본문
//! └── Models    - 자격 증명, 권한 플래그
//!      │
//!      ▼
//! Services (ApiClient, SessionState)
//! ```

pub mod dto;
pub mod entities;
pub mod models;

pub use dto::*;
pub use entities::*;
pub use models::*;
