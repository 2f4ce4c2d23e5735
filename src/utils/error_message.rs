//! # 에러 메시지 추출
//!
//! 백엔드가 돌려준 에러 본문에서 사람이 읽을 수 있는 단일 메시지를 뽑아냅니다.
//!
//! ## 우선순위
//!
//! 1. 문자열 `detail` 필드
//! 2. 문자열 `message` 필드
//! 3. `non_field_errors` 배열의 첫 번째 문자열
//! 4. 문자열 배열인 다른 필드의 첫 값 (`"<field>: <message>"` 형식)
//!
//! 어느 것도 없으면 `None`을 반환하고, 호출자가 전송 계층 메시지로 대체합니다.

use serde_json::Value;

/// 에러 본문에 쓸 만한 메시지가 없을 때 사용하는 기본 메시지
pub const GENERIC_FAILURE: &str = "Request failed";

/// 응답 본문에서 사용자용 에러 메시지를 추출합니다.
///
/// # Examples
///
/// ```rust,ignore
/// let body = json!({"email": ["user with this email already exists."]});
/// assert_eq!(
///     extract_error_message(&body).as_deref(),
///     Some("email: user with this email already exists.")
/// );
/// ```
pub fn extract_error_message(body: &Value) -> Option<String> {
    let fields = body.as_object()?;

    if let Some(Value::String(detail)) = fields.get("detail") {
        return Some(detail.clone());
    }
    if let Some(Value::String(message)) = fields.get("message") {
        return Some(message.clone());
    }
    if let Some(Value::Array(items)) = fields.get("non_field_errors") {
        if let Some(first) = items.iter().find_map(Value::as_str) {
            return Some(first.to_string());
        }
    }

    fields
        .iter()
        .filter(|(key, _)| key.as_str() != "non_field_errors")
        .find_map(|(key, value)| match value {
            Value::Array(items) => items
                .first()
                .and_then(Value::as_str)
                .map(|first| format!("{}: {}", key, first)),
            _ => None,
        })
}

/// 상태 코드만 알 수 있을 때의 메시지
pub fn status_failure_message(status: u16) -> String {
    format!("Request failed with status code {}", status)
}
