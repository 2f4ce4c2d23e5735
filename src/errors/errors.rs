//! 클라이언트 전역에서 사용하는 에러 시스템
//!
//! 인증 파이프라인과 세션 상태가 공유하는 통합 에러 타입입니다.
//! `thiserror`를 사용하며, HTTP 실패의 경우 `Display` 결과가 곧
//! 사용자에게 보여줄 메시지가 되도록 설계되어 있습니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use mediscope_client::errors::ApiError;
//!
//! match client.get::<serde_json::Value>("/analyses/", RequestOptions::default()).await {
//!     Ok(page) => render(page),
//!     Err(ApiError::Status { status: 404, .. }) => show_empty(),
//!     Err(e) => show_banner(&e.to_string()),
//! }
//! ```

use serde_json::Value;
use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// 전송 계층, 백엔드 응답, 로컬 저장소에서 발생할 수 있는 실패를 포괄합니다.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// 네트워크 단절, 타임아웃 등 전송 계층 실패
    ///
    /// 메시지는 전송 계층이 보고한 그대로 유지됩니다.
    #[error("{message}")]
    Transport { message: String, timed_out: bool },

    /// 백엔드가 에러 상태 코드로 응답한 경우
    ///
    /// `message`는 응답 본문에서 추출한 사람이 읽을 수 있는 메시지입니다.
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        body: Value,
    },

    /// 응답 본문이 기대한 타입과 일치하지 않음
    #[error("Decode error: {0}")]
    Decode(String),

    /// 백엔드가 약속된 계약을 어긴 응답을 보냄 (예: 자격 증명이 없는 로그인 응답)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// 로컬 영구 저장소 읽기/쓰기 실패
    #[error("Storage error: {0}")]
    Storage(String),

    /// 잘못된 설정값
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP 상태 코드가 있는 실패라면 그 값을 반환합니다.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 401 응답으로 인한 실패인지 확인
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// 전송 계층 타임아웃인지 확인
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Transport { timed_out: true, .. })
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type ApiResult<T> = Result<T, ApiError>;

/// 외부 라이브러리 에러를 ApiError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 저장소 관련 컨텍스트와 함께 에러를 변환합니다.
    fn storage_context(self, msg: &str) -> ApiResult<T>;

    /// 응답 해석 관련 컨텍스트와 함께 에러를 변환합니다.
    fn decode_context(self, msg: &str) -> ApiResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn storage_context(self, msg: &str) -> ApiResult<T> {
        self.map_err(|e| ApiError::Storage(format!("{}: {}", msg, e)))
    }

    fn decode_context(self, msg: &str) -> ApiResult<T> {
        self.map_err(|e| ApiError::Decode(format!("{}: {}", msg, e)))
    }
}
