//! `reqwest` 기반 HTTP 전송 구현

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};

use super::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MultipartPart, MultipartPayload,
    RequestBody, TransportError, parse_body,
};
use crate::errors::{ApiError, ApiResult};

/// 운영 환경용 전송 계층
///
/// 내부의 `reqwest::Client`는 커넥션 풀을 공유하므로 인스턴스 하나를 재사용합니다.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// 기본 설정으로 전송 계층을 생성합니다.
    ///
    /// # Errors
    ///
    /// * `ApiError::Config` - TLS 백엔드 초기화 실패 등 클라이언트 구성 오류
    pub fn new() -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("mediscope-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Config(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self { client })
    }

    /// 미리 구성된 `reqwest::Client` 사용
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(to_method(request.method), request.url.as_str());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(payload) => builder.multipart(to_form(payload)?),
        };

        let response = builder.send().await.map_err(TransportError::from)?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(TransportError::from)?;

        Ok(HttpResponse {
            status,
            body: parse_body(&bytes),
        })
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError {
            message: e.to_string(),
            timed_out: e.is_timeout(),
        }
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn to_form(payload: MultipartPayload) -> Result<Form, TransportError> {
    let mut form = Form::new();

    for part in payload.parts().iter().cloned() {
        form = match part {
            MultipartPart::Text { name, value } => form.text(name, value),
            MultipartPart::File {
                name,
                file_name,
                mime,
                bytes,
            } => {
                let mut file_part = Part::bytes(bytes).file_name(file_name);
                if let Some(mime) = mime {
                    file_part = file_part.mime_str(&mime).map_err(|e| {
                        TransportError::new(format!("잘못된 MIME 타입 {}: {}", mime, e))
                    })?;
                }
                form.part(name, file_part)
            }
        };
    }

    Ok(form)
}
