//! 인증 자격 증명(Credential Pair) 모델
//!
//! API 호출을 인가하는 bearer 비밀값을 표현합니다.
//! 단일 토큰과 액세스/리프레시 쌍은 하나의 논리 타입의 상호 배타적인 변형이며,
//! 두 표현이 동시에 저장되는 일은 타입 수준에서 불가능합니다.
//!
//! ## 백엔드 응답 해석 규칙
//!
//! | 응답 필드 | 결과 |
//! |-----------|------|
//! | `access` (+ 선택적 `refresh`) | [`Credentials::Pair`] |
//! | `token` | [`Credentials::Bearer`] |
//! | `access`와 `token` 동시 존재 | `ApiError::Protocol` |
//! | 둘 다 없음 | `ApiError::Protocol` |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ApiError, ApiResult};

/// 현재 세션의 자격 증명
///
/// 영구 저장 시 `kind` 태그로 변형을 구분합니다.
///
/// ```json
/// {"kind": "pair", "access": "AAA", "refresh": "RRR"}
/// {"kind": "bearer", "token": "TTT"}
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Credentials {
    /// 단일 불투명 bearer 토큰
    Bearer { token: String },
    /// 액세스 토큰과 (선택적) 리프레시 토큰 쌍
    Pair {
        access: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        refresh: Option<String>,
    },
}

impl Credentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Credentials::Bearer { token: token.into() }
    }

    pub fn pair(access: impl Into<String>, refresh: Option<String>) -> Self {
        Credentials::Pair {
            access: access.into(),
            refresh,
        }
    }

    /// `Authorization` 헤더에 실릴 값 (액세스 토큰 또는 단일 토큰)
    pub fn access_token(&self) -> &str {
        match self {
            Credentials::Bearer { token } => token,
            Credentials::Pair { access, .. } => access,
        }
    }

    /// 토큰 갱신에 사용할 리프레시 토큰
    pub fn refresh_token(&self) -> Option<&str> {
        match self {
            Credentials::Bearer { .. } => None,
            Credentials::Pair { refresh, .. } => refresh.as_deref(),
        }
    }

    /// `Bearer <token>` 형식의 헤더 값
    pub fn authorization_header(&self) -> String {
        bearer_header(self.access_token())
    }

    /// 갱신 결과를 현재 자격 증명에 병합합니다.
    ///
    /// 새 액세스 토큰은 항상 교체되고, 리프레시 토큰은 응답에 포함된 경우에만 교체됩니다.
    pub fn refreshed(&self, grant: &RefreshGrant) -> Credentials {
        let refresh = grant
            .refresh
            .clone()
            .or_else(|| self.refresh_token().map(str::to_string));

        Credentials::Pair {
            access: grant.access.clone(),
            refresh,
        }
    }

    /// 액세스 값만 교체합니다.
    ///
    /// 쌍 표현이면 기존 리프레시 토큰을 유지하고, 단일 토큰이면 단일 토큰으로 남습니다.
    pub fn with_access(&self, access: impl Into<String>) -> Credentials {
        match self {
            Credentials::Bearer { .. } => Credentials::bearer(access),
            Credentials::Pair { refresh, .. } => Credentials::pair(access, refresh.clone()),
        }
    }
}

/// 토큰 값이 로그에 남지 않도록 가린 Debug 출력
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Bearer { .. } => f.write_str("Credentials::Bearer { token: *** }"),
            Credentials::Pair { refresh, .. } => write!(
                f,
                "Credentials::Pair {{ access: ***, refresh: {} }}",
                if refresh.is_some() { "***" } else { "None" }
            ),
        }
    }
}

/// `Bearer <token>` 헤더 값 생성
pub fn bearer_header(token: &str) -> String {
    format!("Bearer {}", token)
}

/// 토큰 갱신 성공 결과
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshGrant {
    pub access: String,
    pub refresh: Option<String>,
}

/// 백엔드 응답에 포함된 자격 증명 필드
///
/// 로그인/회원가입/갱신 응답에서 공통으로 사용됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl TokenFields {
    /// 로그인/회원가입 응답의 필드를 자격 증명으로 변환합니다.
    ///
    /// # Errors
    ///
    /// * `ApiError::Protocol` - 두 표현이 섞여 있거나 자격 증명이 없음
    pub fn into_credentials(self) -> ApiResult<Credentials> {
        match (self.access, self.token) {
            (Some(_), Some(_)) => Err(ApiError::Protocol(
                "응답에 access와 token이 동시에 포함되어 있습니다".to_string(),
            )),
            (Some(access), None) => Ok(Credentials::Pair {
                access,
                refresh: self.refresh,
            }),
            (None, Some(token)) if self.refresh.is_none() => Ok(Credentials::Bearer { token }),
            (None, Some(_)) => Err(ApiError::Protocol(
                "단일 token 응답에 refresh가 함께 포함되어 있습니다".to_string(),
            )),
            (None, None) => Err(ApiError::Protocol(
                "응답에 자격 증명이 없습니다".to_string(),
            )),
        }
    }

    /// 토큰 갱신 응답의 필드를 갱신 결과로 변환합니다.
    ///
    /// `access`가 없으면 `token`을 새 액세스 값으로 사용합니다.
    pub fn into_refresh_grant(self) -> ApiResult<RefreshGrant> {
        match (self.access, self.token) {
            (Some(_), Some(_)) => Err(ApiError::Protocol(
                "갱신 응답에 access와 token이 동시에 포함되어 있습니다".to_string(),
            )),
            (Some(access), None) | (None, Some(access)) => Ok(RefreshGrant {
                access,
                refresh: self.refresh,
            }),
            (None, None) => Err(ApiError::Protocol(
                "갱신 응답에 새 액세스 토큰이 없습니다".to_string(),
            )),
        }
    }
}
