//! # HTTP 전송 계층
//!
//! 인증 파이프라인이 감싸는 범용 HTTP 전송 추상화입니다.
//! 실제 구현은 [`reqwest_transport::ReqwestTransport`]이며,
//! 테스트에서는 스크립트 기반 목(mock) 전송 계층을 주입합니다.
//!
//! ## 설계
//!
//! - 요청 값([`HttpRequest`])은 `Clone` 가능해야 합니다. 401 이후 토큰 갱신이 끝나면
//!   같은 요청을 한 번 더 보내야 하기 때문입니다.
//! - 멀티파트 본문은 소유한 파트 목록([`MultipartPayload`])으로 보관하고,
//!   전송 시점마다 전송 계층 고유의 폼으로 변환합니다.
//! - 응답 본문은 JSON으로 해석하며, 빈 본문은 `null`, JSON이 아닌 본문은 문자열이 됩니다.

pub mod reqwest_transport;

#[cfg(test)]
pub mod mock;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use reqwest_transport::ReqwestTransport;

/// 지원하는 HTTP 메서드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 멀티파트 본문의 한 파트
#[derive(Debug, Clone, PartialEq)]
pub enum MultipartPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime: Option<String>,
        bytes: Vec<u8>,
    },
}

/// 파일 업로드용 멀티파트 본문
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartPayload {
    parts: Vec<MultipartPart>,
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// 텍스트 필드 추가
    pub fn text(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.parts.push(MultipartPart::Text {
            name: name.into(),
            value: value.to_string(),
        });
        self
    }

    /// 파일 파트 추가
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: Option<&str>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(MultipartPart::File {
            name: name.into(),
            file_name: file_name.into(),
            mime: mime.map(str::to_string),
            bytes,
        });
        self
    }

    pub fn parts(&self) -> &[MultipartPart] {
        &self.parts
    }
}

/// 요청 본문
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartPayload),
}

/// 전송 계층에 전달되는 완성된 요청
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: RequestBody::Empty,
            timeout: None,
        }
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// 헤더 조회 (대소문자 무시)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// 같은 이름의 헤더를 모두 제거한 뒤 새 값으로 설정 (대소문자 무시)
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
    }

    pub fn remove_header(&mut self, name: &str) {
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
    }
}

/// 전송 계층 응답
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

impl HttpResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 전송 계층 실패 (연결 실패, 타임아웃 등)
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub timed_out: bool,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: true,
        }
    }
}

/// HTTP 전송 추상화
///
/// 인증 헤더 부착, 401 처리, 재시도는 모두 상위 계층의 책임이며
/// 구현체는 요청을 한 번 그대로 보내고 결과를 돌려주기만 합니다.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// 응답 본문 바이트를 JSON 값으로 해석합니다.
pub fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_body_variants() {
        assert_eq!(parse_body(b""), Value::Null);
        assert_eq!(parse_body(b"  \n"), Value::Null);
        assert_eq!(parse_body(br#"{"detail":"ok"}"#), json!({"detail": "ok"}));
        assert_eq!(parse_body(b"Bad Gateway"), json!("Bad Gateway"));
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let mut request = HttpRequest::new(HttpMethod::Get, "http://api/x/");
        request.headers.push(("authorization".to_string(), "Bearer OLD".to_string()));

        request.set_header("Authorization", "Bearer NEW");

        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header("AUTHORIZATION"), Some("Bearer NEW"));

        request.remove_header("authorization");
        assert_eq!(request.header("Authorization"), None);
    }

    #[test]
    fn test_success_range() {
        assert!(HttpResponse::new(204, Value::Null).is_success());
        assert!(!HttpResponse::new(302, Value::Null).is_success());
        assert!(!HttpResponse::new(401, Value::Null).is_success());
    }

    #[test]
    fn test_multipart_builder_keeps_order() {
        let payload = MultipartPayload::new()
            .text("patient", 12)
            .file("file", "cbc.pdf", Some("application/pdf"), vec![1, 2, 3]);

        assert_eq!(payload.parts().len(), 2);
        assert_eq!(
            payload.parts()[0],
            MultipartPart::Text {
                name: "patient".to_string(),
                value: "12".to_string()
            }
        );
    }
}
