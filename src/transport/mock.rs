//! 테스트용 스크립트 기반 전송 계층
//!
//! 모든 요청을 기록하고, 라우팅 클로저가 돌려준 응답을 (필요하면 지연 후) 반환합니다.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// 목 응답
#[derive(Debug, Clone)]
pub enum MockReply {
    Respond {
        status: u16,
        body: Value,
        delay: Option<Duration>,
    },
    Fail(TransportError),
}

impl MockReply {
    pub fn json(status: u16, body: Value) -> Self {
        MockReply::Respond {
            status,
            body,
            delay: None,
        }
    }

    pub fn fail(message: &str) -> Self {
        MockReply::Fail(TransportError::new(message))
    }

    /// 응답 전에 지연을 둡니다.
    pub fn delayed(self, by: Duration) -> Self {
        match self {
            MockReply::Respond { status, body, .. } => MockReply::Respond {
                status,
                body,
                delay: Some(by),
            },
            other => other,
        }
    }
}

type Handler = dyn Fn(&HttpRequest) -> MockReply + Send + Sync;

pub struct MockTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Arc<Self>
    where
        F: Fn(&HttpRequest) -> MockReply + Send + Sync + 'static,
    {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// 지금까지 받은 모든 요청
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// URL이 주어진 경로로 끝나는 요청들
    pub fn requests_to(&self, path: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.ends_with(path))
            .collect()
    }

    pub fn count_to(&self, path: &str) -> usize {
        self.requests_to(path).len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        match (self.handler)(&request) {
            MockReply::Respond {
                status,
                body,
                delay,
            } => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(HttpResponse { status, body })
            }
            MockReply::Fail(error) => Err(error),
        }
    }
}
