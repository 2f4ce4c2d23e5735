//! 화면 라우트 게이팅 모듈
//!
//! 세션에서 파생된 권한 플래그([`AuthFlags`])만으로 화면 접근 여부를 결정합니다.
//! 보호된 라우트는 `is_authenticated`와 해당 역할 플래그가 모두 참일 때만 렌더링되고,
//! 그 외에는 비인증 랜딩(`/`)으로 리다이렉트됩니다.
//!
//! # Routes
//!
//! | 경로 | 라우트 | 필요 조건 |
//! |------|--------|-----------|
//! | `/` | [`AppRoute::Landing`] | 없음 |
//! | `/doctor` | [`AppRoute::Doctor`] | 인증 + `is_doctor` |
//! | `/patient` | [`AppRoute::Patient`] | 인증 + `is_patient` |
//! | `/admin` | [`AppRoute::Admin`] | 인증 + `is_admin` |
//! | 그 외 | - | 항상 `/`로 리다이렉트 |
//!
//! # Examples
//!
//! ```rust,ignore
//! use mediscope_client::routes::{resolve, RouteDecision};
//!
//! match resolve("/doctor", &session.flags()) {
//!     RouteDecision::Render(route) => render(route),
//!     RouteDecision::Redirect(to) => navigate(to),
//! }
//! ```

use std::fmt;

use serde::Serialize;

use crate::domain::entities::session_user::Role;
use crate::domain::models::auth_flags::AuthFlags;

/// 비인증 사용자가 돌아가는 경로
pub const LANDING_PATH: &str = "/";

/// 애플리케이션 화면 라우트
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AppRoute {
    Landing,
    Doctor,
    Patient,
    Admin,
}

impl AppRoute {
    pub const ALL: [AppRoute; 4] = [
        AppRoute::Landing,
        AppRoute::Doctor,
        AppRoute::Patient,
        AppRoute::Admin,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            AppRoute::Landing => LANDING_PATH,
            AppRoute::Doctor => "/doctor",
            AppRoute::Patient => "/patient",
            AppRoute::Admin => "/admin",
        }
    }

    /// 라우트가 요구하는 역할. 랜딩은 `None`.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            AppRoute::Landing => None,
            AppRoute::Doctor => Some(Role::Doctor),
            AppRoute::Patient => Some(Role::Patient),
            AppRoute::Admin => Some(Role::Admin),
        }
    }

    /// 경로 문자열 해석
    ///
    /// 쿼리 문자열, 프래그먼트, 끝의 `/`는 무시합니다.
    pub fn from_path(path: &str) -> Option<AppRoute> {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');
        let path = if path.is_empty() { LANDING_PATH } else { path };

        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    /// 로그인 직후 이동할 역할별 화면
    pub fn home_for(role: Role) -> AppRoute {
        match role {
            Role::Admin => AppRoute::Admin,
            Role::Doctor => AppRoute::Doctor,
            Role::Patient => AppRoute::Patient,
        }
    }

    /// 권한 플래그가 이 라우트를 허용하는지 확인
    pub fn is_allowed(&self, flags: &AuthFlags) -> bool {
        match self.required_role() {
            None => true,
            Some(role) => flags.permits(role),
        }
    }
}

impl fmt::Display for AppRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// 라우트 해석 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RouteDecision {
    /// 요청한 화면을 렌더링
    Render(AppRoute),
    /// 주어진 경로로 대체 이동
    Redirect(&'static str),
}

/// 경로와 권한 플래그로 렌더링/리다이렉트를 결정합니다.
pub fn resolve(path: &str, flags: &AuthFlags) -> RouteDecision {
    match AppRoute::from_path(path) {
        Some(route) if route.is_allowed(flags) => RouteDecision::Render(route),
        _ => RouteDecision::Redirect(LANDING_PATH),
    }
}
