//! 인증 요청 DTO
//!
//! 로그인, 회원가입, 토큰 갱신 엔드포인트로 전송되는 요청 본문입니다.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::entities::session_user::{Gender, Role};

/// 로그인 요청 (`POST /authentication/knock/knock/`)
#[derive(Clone, Serialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

impl LoginPayload {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginPayload")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// 환자 하위 프로필
///
/// 알려진 필드 외의 값은 `extra`에 그대로 보존됩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    #[serde(default)]
    pub family_history: String,
    #[serde(default)]
    pub risk_factors: String,
    #[serde(default)]
    pub insurance_provider: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 의사 하위 프로필 (관리자가 생성하는 계정에서만 사용)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoctorProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital_affiliation: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 회원가입 요청 (`POST /authentication/signup/`)
#[derive(Clone, Serialize, Deserialize)]
pub struct SignupPayload {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub birthday: NaiveDate,
    pub gender: Gender,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_profile: Option<DoctorProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_profile: Option<PatientProfile>,
}

impl SignupPayload {
    /// 공개 자가 가입용 요청으로 변환합니다.
    ///
    /// 호출자가 어떤 역할을 넣었든 `Patient`로 고정하고, 의사 프로필은 제거하며,
    /// 환자 프로필이 없으면 빈 기본 프로필을 채웁니다.
    pub fn into_patient_signup(self) -> Self {
        Self {
            role: Role::Patient,
            doctor_profile: None,
            patient_profile: Some(self.patient_profile.unwrap_or_default()),
            ..self
        }
    }
}

impl fmt::Debug for SignupPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupPayload")
            .field("email", &self.email)
            .field("password", &"***")
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// 토큰 갱신 요청 (`POST /authentication/refresh/`)
#[derive(Serialize)]
pub struct RefreshPayload<'a> {
    pub refresh: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(role: Role) -> SignupPayload {
        SignupPayload {
            email: "new@patient.example".to_string(),
            password: "secret123".to_string(),
            first_name: "Jiho".to_string(),
            last_name: "Lee".to_string(),
            phone: "+82-10-0000-0000".to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
            gender: Gender::Man,
            role,
            doctor_profile: Some(DoctorProfile {
                specialization: Some("Surgery".to_string()),
                ..DoctorProfile::default()
            }),
            patient_profile: None,
        }
    }

    #[test]
    fn test_patient_signup_forces_role_and_profiles() {
        for role in [Role::Admin, Role::Doctor, Role::Patient] {
            let body = serde_json::to_value(sample(role).into_patient_signup()).unwrap();

            assert_eq!(body["role"], "Patient");
            assert!(body.get("doctor_profile").is_none());
            assert_eq!(
                body["patient_profile"],
                json!({"family_history": "", "risk_factors": "", "insurance_provider": ""})
            );
        }
    }

    #[test]
    fn test_patient_signup_keeps_given_profile() {
        let mut payload = sample(Role::Patient);
        let mut extra = Map::new();
        extra.insert("blood_type".to_string(), json!("A+"));
        payload.patient_profile = Some(PatientProfile {
            family_history: "diabetes".to_string(),
            extra,
            ..PatientProfile::default()
        });

        let body = serde_json::to_value(payload.into_patient_signup()).unwrap();

        assert_eq!(body["patient_profile"]["family_history"], "diabetes");
        assert_eq!(body["patient_profile"]["blood_type"], "A+");
        assert_eq!(body["birthday"], "1990-01-15");
        assert_eq!(body["gender"], "M");
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?} {:?}", LoginPayload::new("a@b.com", "secret123"), sample(Role::Patient));

        assert!(!rendered.contains("secret123"));
    }
}
