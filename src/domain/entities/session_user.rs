//! Session User Entity
//!
//! 로그인한 사용자의 로컬 캐시 표현입니다.
//! 역할(Role)은 세션 동안 변하지 않으며, 역할 플래그 계산의 유일한 근거가 됩니다.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 사용자 역할 (닫힌 집합)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Doctor,
    Patient,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Doctor => "Doctor",
            Role::Patient => "Patient",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 성별 (백엔드 표기: `M`, `W`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Man,
    #[serde(rename = "W")]
    Woman,
}

/// 세션 사용자
///
/// 로그인/회원가입 응답의 `user` 객체 또는 외부에서 주입된 사용자 객체로 생성되며,
/// 로그아웃 시 제거됩니다. 소비자에게는 읽기 전용입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_last_updated: Option<DateTime<Utc>>,
    /// 의사 전용 하위 프로필
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_profile: Option<Map<String, Value>>,
    /// 환자 전용 하위 프로필
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_profile: Option<Map<String, Value>>,
}

impl SessionUser {
    /// 필수 필드만으로 사용자 생성
    pub fn new(id: Option<i64>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            email: email.into(),
            role,
            first_name: None,
            last_name: None,
            phone: None,
            birthday: None,
            gender: None,
            date_created: None,
            date_last_updated: None,
            doctor_profile: None,
            patient_profile: None,
        }
    }

    /// 특정 역할인지 확인
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// 표시용 이름. 이름이 없으면 이메일을 사용합니다.
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if full.is_empty() { self.email.clone() } else { full }
    }
}
