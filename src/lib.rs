//! 메디스코프 임상 기록 클라이언트 코어
//!
//! 임상 기록 웹 애플리케이션의 인증 HTTP 클라이언트와 세션/권한 상태를 제공하는
//! Rust 라이브러리입니다. 원격 REST API 호출에 bearer 자격 증명을 붙이고,
//! 자격 증명 만료를 단일 비행 토큰 갱신으로 복구하며, 역할 기반 화면 접근을 결정합니다.
//!
//! # Features
//!
//! - **인증 HTTP 클라이언트**: bearer 부착, 401 시 1회 갱신 후 재시도, 에러 메시지 추출
//! - **단일 비행 갱신**: 동시에 401을 받은 요청들이 하나의 갱신 호출을 공유
//! - **세션 상태**: 로그인, 환자 자가 가입, 항상 성공하는 로그아웃
//! - **권한 플래그**: `is_authenticated` / `is_doctor` / `is_patient` / `is_admin`
//! - **영구 저장**: 자격 증명과 세션 사용자를 서로 다른 키에 저장
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │     Routes      │ ← 권한 플래그 기반 화면 게이팅
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← SessionState, ApiClient, SingleFlight
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │     Domain      │ ← Credentials, SessionUser, DTO
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │Transport/Storage│ ← reqwest, 파일/메모리 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mediscope_client::config::ClientSettings;
//! use mediscope_client::services::{client::ApiClient, session::SessionState};
//! use mediscope_client::storage::FileStorage;
//!
//! let api = ApiClient::with_reqwest(ClientSettings::from_env()?, Arc::new(FileStorage::new(".mediscope")))?;
//! let session = SessionState::new(api);
//!
//! let user = session.login("a@b.com", "secret123").await?;
//! let notes: serde_json::Value = session.api().get("/notes/", Default::default()).await?;
//! ```

pub mod config;
pub mod domain;
pub mod errors;
pub mod routes;
pub mod services;
pub mod storage;
pub mod transport;
pub mod utils;
