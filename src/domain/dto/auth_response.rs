//! 인증 응답 DTO

use serde::{Deserialize, Serialize};

use crate::domain::entities::session_user::SessionUser;
use crate::domain::models::credentials::TokenFields;

/// 로그인/회원가입 성공 응답
///
/// `user` 객체와 함께 `{access, refresh}` 또는 `{token}` 자격 증명 필드를 담습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: SessionUser,
    #[serde(flatten)]
    pub tokens: TokenFields,
}

/// 로그아웃 응답
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogoutResponse {
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::session_user::Role;
    use crate::domain::models::credentials::Credentials;
    use serde_json::json;

    #[test]
    fn test_login_response_with_pair() {
        let response: AuthResponse = serde_json::from_value(json!({
            "access": "AAA",
            "refresh": "RRR",
            "user": {"id": 1, "email": "a@b.com", "role": "Doctor"}
        }))
        .unwrap();

        assert_eq!(response.user.role, Role::Doctor);
        assert_eq!(
            response.tokens.into_credentials().unwrap(),
            Credentials::pair("AAA", Some("RRR".to_string()))
        );
    }

    #[test]
    fn test_login_response_with_single_token() {
        let response: AuthResponse = serde_json::from_value(json!({
            "token": "TTT",
            "user": {"email": "p@b.com", "role": "Patient"}
        }))
        .unwrap();

        assert_eq!(
            response.tokens.into_credentials().unwrap(),
            Credentials::bearer("TTT")
        );
    }
}
