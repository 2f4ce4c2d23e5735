//! 역할 기반 권한 플래그
//!
//! 라우트 게이팅이 소비하는 유일한 권한 계약입니다.
//! `is_authenticated`는 자격 증명 존재 여부만으로, 역할 플래그는 세션 사용자의 역할로 계산됩니다.

use serde::Serialize;

use crate::domain::entities::session_user::{Role, SessionUser};

/// 세션에서 파생된 권한 플래그
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AuthFlags {
    pub is_authenticated: bool,
    pub is_doctor: bool,
    pub is_patient: bool,
    pub is_admin: bool,
}

impl AuthFlags {
    /// 자격 증명 존재 여부와 세션 사용자로부터 플래그를 계산합니다.
    pub fn derive(has_credentials: bool, user: Option<&SessionUser>) -> Self {
        let role = user.map(|u| u.role);

        Self {
            is_authenticated: has_credentials,
            is_doctor: role == Some(Role::Doctor),
            is_patient: role == Some(Role::Patient),
            is_admin: role == Some(Role::Admin),
        }
    }

    /// 해당 역할 플래그 값
    pub fn has_role(&self, role: Role) -> bool {
        match role {
            Role::Admin => self.is_admin,
            Role::Doctor => self.is_doctor,
            Role::Patient => self.is_patient,
        }
    }

    /// 인증 상태이면서 역할 플래그가 참일 때만 허용
    pub fn permits(&self, role: Role) -> bool {
        self.is_authenticated && self.has_role(role)
    }
}
