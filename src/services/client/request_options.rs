//! 요청 단위 옵션 (헤더, 쿼리 파라미터, 타임아웃)

use std::time::Duration;

/// 개별 요청에 적용할 추가 설정
///
/// ```rust,ignore
/// let options = RequestOptions::new()
///     .query("patient", patient_id)
///     .query("page_size", 10)
///     .query_opt("search", search_text.as_deref())
///     .timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// 값이 `None`이면 파라미터를 생략합니다.
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// 클라이언트 기본 타임아웃 대신 사용할 타임아웃
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
