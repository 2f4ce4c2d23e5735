//! # 세션/권한 상태 서비스
//!
//! 현재 세션 사용자를 보관하고 역할 기반 권한 플래그를 노출합니다.
//! 로그인, 환자 회원가입, 로그아웃은 인증 HTTP 클라이언트 호출과
//! 로컬 상태 변경을 조합한 연산입니다.
//!
//! ## 상태 전이
//!
//! ```text
//!            login / signup_patient 호출
//! Anonymous ───────────────────────────► Authenticating
//!     ▲                                        │ 성공: 자격 증명 + 사용자 저장
//!     │                                        ▼
//!     └──── logout / 갱신 실패 ─────────── Authenticated
//! ```
//!
//! 역할은 `Authenticated`의 하위 상태가 아니라 플래그로만 검사되는 속성입니다.
//!
//! ## 영구 저장
//!
//! 세션 사용자는 자격 증명과 별개의 키에 저장됩니다.
//! 자격 증명이 사라졌는데 사용자만 남아 있으면 (예: 토큰 갱신 실패)
//! 다음 조회 시점에 사용자도 정리되어 `Anonymous`로 돌아갑니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! let session = SessionState::new(api_client);
//!
//! let user = session.login("a@b.com", "secret123").await?;
//! let destination = AppRoute::home_for(user.role);
//!
//! if session.flags().permits(Role::Doctor) {
//!     render_doctor_dashboard();
//! }
//!
//! session.logout().await; // 백엔드 실패와 무관하게 항상 로컬 세션 정리
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use log::{debug, info, warn};
use serde::Serialize;
use serde_json::{Value, json};

use crate::config::AuthPaths;
use crate::domain::dto::{AuthResponse, LoginPayload, SignupPayload};
use crate::domain::entities::session_user::SessionUser;
use crate::domain::models::auth_flags::AuthFlags;
use crate::errors::{ApiError, ApiResult};
use crate::services::client::{ApiClient, RequestOptions};
use crate::storage::{load_json, store_json};

/// 세션 상태 머신의 현재 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    /// 자격 증명도 사용자도 없음
    Anonymous,
    /// 로그인/회원가입 호출 진행 중
    Authenticating,
    /// 자격 증명과 세션 사용자가 모두 존재
    Authenticated,
}

/// UI 소비용 세션 스냅샷
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub user: Option<SessionUser>,
    pub flags: AuthFlags,
    pub loading: bool,
    pub last_error: Option<String>,
}

/// 세션/권한 상태
///
/// 애플리케이션 시작 시 한 번 생성해 소비자에게 참조로 전달합니다.
pub struct SessionState {
    api: ApiClient,
    user: RwLock<Option<SessionUser>>,
    authenticating: AtomicUsize,
}

impl SessionState {
    /// 세션 상태를 생성하고 저장소에서 사용자를 복원합니다.
    pub fn new(api: ApiClient) -> Self {
        let session = Self {
            api,
            user: RwLock::new(None),
            authenticating: AtomicUsize::new(0),
        };
        session.restore();
        session
    }

    /// 저장소에 남아 있는 세션 사용자를 다시 읽어옵니다.
    ///
    /// 자격 증명이 없으면 복원된 사용자는 즉시 정리됩니다.
    pub fn restore(&self) {
        let storage = self.api.storage();
        let restored: Option<SessionUser> = load_json(storage.as_ref(), &self.api.settings().user_key);

        if let Some(user) = &restored {
            debug!("세션 사용자 복원: {} ({})", user.email, user.role);
        }
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = restored;
        self.reconcile();
    }

    /// 내부 인증 HTTP 클라이언트 (리소스 엔드포인트 호출용)
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    // ---------------------------------------------------------------------
    // 인증 연산
    // ---------------------------------------------------------------------

    /// 이메일/비밀번호 로그인
    ///
    /// 성공하면 응답의 자격 증명과 사용자 객체로 세션을 구성하고,
    /// 역할 기반 이동 결정을 위해 사용자를 반환합니다.
    ///
    /// # Errors
    ///
    /// * `ApiError::Status` - 백엔드가 거부 (추출된 메시지 그대로)
    /// * `ApiError::Protocol` - 응답에 자격 증명이 없거나 두 표현이 섞여 있음
    /// * `ApiError::Storage` - 세션은 메모리에 구성되었으나 저장 실패
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<SessionUser> {
        let _authenticating = self.begin_authenticating();
        info!("🔐 로그인 시도: {}", email);

        let payload = LoginPayload::new(email, password);
        let response: AuthResponse = self
            .api
            .post(AuthPaths::LOGIN, &payload, RequestOptions::new())
            .await?;

        let user = self.establish(response)?;
        info!("✅ 로그인 성공: {} ({})", user.email, user.role);
        Ok(user)
    }

    /// 환자 자가 회원가입
    ///
    /// 호출자가 어떤 역할을 넣었든 `Patient`로 가입합니다.
    /// 성공 시 로그인과 같은 방식으로 세션을 구성하지만 사용자를 반환하지는 않습니다.
    pub async fn signup_patient(&self, payload: SignupPayload) -> ApiResult<()> {
        let _authenticating = self.begin_authenticating();

        let payload = payload.into_patient_signup();
        info!("📝 환자 회원가입 요청: {}", payload.email);

        let response: AuthResponse = self
            .api
            .post(AuthPaths::SIGNUP, &payload, RequestOptions::new())
            .await?;

        let user = self.establish(response)?;
        info!("✅ 회원가입 완료: {} ({})", user.email, user.role);
        Ok(())
    }

    /// 로그아웃
    ///
    /// 백엔드 호출 결과와 관계없이 자격 증명과 세션 사용자를 로컬에서 제거합니다.
    pub async fn logout(&self) {
        let result: ApiResult<Value> = self
            .api
            .post(AuthPaths::LOGOUT, &json!({}), RequestOptions::new())
            .await;

        if let Err(e) = result {
            warn!("⚠️ 로그아웃 요청 실패, 로컬 세션만 정리: {}", e);
            self.api.clear_error();
        }

        self.end_session();
        info!("👋 로그아웃 완료");
    }

    /// 외부에서 받은 사용자 객체로 세션 사용자를 교체합니다. `None`은 삭제입니다.
    ///
    /// # Errors
    ///
    /// * `ApiError::Protocol` - 자격 증명이 살아 있는 세션에서 역할을 바꾸려는 경우
    pub fn set_user(&self, user: Option<SessionUser>) -> ApiResult<()> {
        let current_role = self.current_user().map(|u| u.role);
        if let (Some(next), Some(current)) = (user.as_ref().map(|u| u.role), current_role) {
            if self.api.is_authenticated() && next != current {
                warn!("🚫 세션 중 역할 변경 거부: {} -> {}", current, next);
                return Err(ApiError::Protocol(format!(
                    "role cannot change within a session ({current} -> {next})"
                )));
            }
        }

        self.store_user(user)
    }

    // ---------------------------------------------------------------------
    // 파생 상태
    // ---------------------------------------------------------------------

    pub fn user(&self) -> Option<SessionUser> {
        self.reconcile();
        self.current_user()
    }

    /// 자격 증명과 세션 사용자로부터 계산한 권한 플래그
    pub fn flags(&self) -> AuthFlags {
        self.reconcile();
        AuthFlags::derive(self.api.is_authenticated(), self.current_user().as_ref())
    }

    pub fn phase(&self) -> SessionPhase {
        self.reconcile();
        if self.authenticating.load(Ordering::SeqCst) > 0 {
            return SessionPhase::Authenticating;
        }
        if self.api.is_authenticated() && self.current_user().is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let phase = self.phase();
        let user = self.current_user();

        SessionSnapshot {
            phase,
            flags: AuthFlags::derive(self.api.is_authenticated(), user.as_ref()),
            user,
            loading: self.api.is_loading(),
            last_error: self.api.last_error(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.flags().is_authenticated
    }

    pub fn is_doctor(&self) -> bool {
        self.flags().is_doctor
    }

    pub fn is_patient(&self) -> bool {
        self.flags().is_patient
    }

    pub fn is_admin(&self) -> bool {
        self.flags().is_admin
    }

    // ---------------------------------------------------------------------
    // 내부 헬퍼
    // ---------------------------------------------------------------------

    fn current_user(&self) -> Option<SessionUser> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn begin_authenticating(&self) -> AuthenticatingGuard<'_> {
        self.authenticating.fetch_add(1, Ordering::SeqCst);
        AuthenticatingGuard {
            counter: &self.authenticating,
        }
    }

    /// 인증 응답으로 세션을 구성합니다.
    ///
    /// 메모리 상태를 모두 바꾼 뒤 저장 실패가 있으면 그 에러를 반환합니다.
    fn establish(&self, response: AuthResponse) -> ApiResult<SessionUser> {
        let credentials = response
            .tokens
            .into_credentials()
            .inspect_err(|e| self.api.record_error(e))?;

        let stored_credentials = self.api.set_credentials(Some(credentials));
        let stored_user = self.store_user(Some(response.user.clone()));

        stored_credentials
            .and(stored_user)
            .inspect_err(|e| self.api.record_error(e))?;
        Ok(response.user)
    }

    fn store_user(&self, user: Option<SessionUser>) -> ApiResult<()> {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = user.clone();

        let storage = self.api.storage();
        store_json(storage.as_ref(), &self.api.settings().user_key, user.as_ref())
            .inspect_err(|e| warn!("⚠️ 세션 사용자 저장 실패: {}", e))
    }

    fn end_session(&self) {
        // 저장소 실패는 각 단계에서 로그로 남고 로컬 정리는 계속 진행합니다.
        let _ = self.api.clear_credentials();
        let _ = self.store_user(None);
    }

    /// 자격 증명이 사라진 세션의 사용자 정리
    fn reconcile(&self) {
        if self.api.is_authenticated() || self.authenticating.load(Ordering::SeqCst) > 0 {
            return;
        }
        if self.current_user().is_none() {
            return;
        }

        info!("🔓 자격 증명이 없는 세션 사용자 정리");
        let _ = self.store_user(None);
    }
}

struct AuthenticatingGuard<'a> {
    counter: &'a AtomicUsize,
}

impl Drop for AuthenticatingGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientSettings;
    use crate::domain::dto::PatientProfile;
    use crate::domain::entities::session_user::{Gender, Role};
    use crate::domain::models::credentials::Credentials;
    use crate::errors::ApiError;
    use crate::storage::{MemoryStorage, Storage};
    use crate::transport::RequestBody;
    use crate::transport::mock::{MockReply, MockTransport};
    use chrono::NaiveDate;
    use std::sync::Arc;
    use std::time::Duration;

    const LOGIN: &str = "/authentication/knock/knock/";
    const SIGNUP: &str = "/authentication/signup/";
    const LOGOUT: &str = "/authentication/logout/";
    const REFRESH: &str = "/authentication/refresh/";

    fn session(transport: &Arc<MockTransport>, storage: &Arc<MemoryStorage>) -> SessionState {
        let settings = ClientSettings::new("http://api.test").unwrap();
        SessionState::new(ApiClient::new(settings, transport.clone(), storage.clone()))
    }

    fn doctor_login_reply() -> MockReply {
        MockReply::json(
            200,
            json!({
                "access": "AAA",
                "refresh": "RRR",
                "user": {"id": 1, "email": "a@b.com", "role": "Doctor"}
            }),
        )
    }

    fn signup_payload(role: Role) -> SignupPayload {
        SignupPayload {
            email: "new@patient.example".to_string(),
            password: "secret123".to_string(),
            first_name: "Jiho".to_string(),
            last_name: "Lee".to_string(),
            phone: "+82-10-0000-0000".to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
            gender: Gender::Woman,
            role,
            doctor_profile: None,
            patient_profile: None,
        }
    }

    #[tokio::test]
    async fn test_login_establishes_doctor_session() {
        let transport = MockTransport::new(|request| {
            if request.url.ends_with(LOGIN) {
                doctor_login_reply()
            } else {
                MockReply::json(200, json!({"results": []}))
            }
        });
        let storage = Arc::new(MemoryStorage::new());
        let session = session(&transport, &storage);

        let user = session.login("a@b.com", "secret123").await.unwrap();

        assert_eq!(user.role, Role::Doctor);
        assert!(session.is_authenticated());
        assert!(session.is_doctor());
        assert!(!session.is_patient() && !session.is_admin());
        assert_eq!(session.phase(), SessionPhase::Authenticated);

        let login = &transport.requests_to(LOGIN)[0];
        assert_eq!(
            login.body,
            RequestBody::Json(json!({"email": "a@b.com", "password": "secret123"}))
        );

        let _: Value = session.api().get("/analyses/", RequestOptions::new()).await.unwrap();
        let follow_up = &transport.requests_to("/analyses/")[0];
        assert_eq!(follow_up.header("Authorization"), Some("Bearer AAA"));

        let stored_user: Option<SessionUser> = load_json(storage.as_ref(), "auth_user");
        assert_eq!(stored_user, Some(user));
        assert!(storage.get("tokens").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_login_with_single_token_response() {
        let transport = MockTransport::new(|_| {
            MockReply::json(
                200,
                json!({"token": "TTT", "user": {"id": 2, "email": "p@b.com", "role": "Patient"}}),
            )
        });
        let storage = Arc::new(MemoryStorage::new());
        let session = session(&transport, &storage);

        session.login("p@b.com", "pw").await.unwrap();

        assert_eq!(session.api().credentials(), Some(Credentials::bearer("TTT")));
        assert!(session.is_patient());
    }

    #[tokio::test]
    async fn test_login_rejection_propagates_extracted_message() {
        let transport = MockTransport::new(|_| {
            MockReply::json(
                400,
                json!({"non_field_errors": ["Unable to log in with provided credentials."]}),
            )
        });
        let storage = Arc::new(MemoryStorage::new());
        let session = session(&transport, &storage);

        let err = session.login("a@b.com", "wrong").await.unwrap_err();

        assert_eq!(err.to_string(), "Unable to log in with provided credentials.");
        assert_eq!(session.phase(), SessionPhase::Anonymous);
        assert_eq!(
            session.snapshot().last_error.as_deref(),
            Some("Unable to log in with provided credentials.")
        );
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_login_without_credentials_is_protocol_error() {
        let transport = MockTransport::new(|_| {
            MockReply::json(200, json!({"user": {"id": 1, "email": "a@b.com", "role": "Admin"}}))
        });
        let storage = Arc::new(MemoryStorage::new());
        let session = session(&transport, &storage);

        let err = session.login("a@b.com", "pw").await.unwrap_err();

        assert!(matches!(err, ApiError::Protocol(_)));
        assert!(!session.is_authenticated());
        assert_eq!(session.user(), None);
        assert!(session.snapshot().last_error.is_some());
    }

    #[tokio::test]
    async fn test_signup_always_creates_patient() {
        let transport = MockTransport::new(|request| {
            let RequestBody::Json(body) = &request.body else {
                return MockReply::json(400, json!({"detail": "expected json"}));
            };
            MockReply::json(
                201,
                json!({
                    "access": "AAA",
                    "refresh": "RRR",
                    "user": {"id": 5, "email": body["email"], "role": body["role"]}
                }),
            )
        });
        let storage = Arc::new(MemoryStorage::new());
        let session = session(&transport, &storage);

        session.signup_patient(signup_payload(Role::Admin)).await.unwrap();

        let RequestBody::Json(body) = &transport.requests_to(SIGNUP)[0].body else {
            panic!("signup body must be JSON");
        };
        assert_eq!(body["role"], "Patient");
        assert_eq!(
            body["patient_profile"],
            serde_json::to_value(PatientProfile::default()).unwrap()
        );
        assert!(session.is_patient());
        assert!(!session.is_admin());
        assert_eq!(session.phase(), SessionPhase::Authenticated);
    }

    #[tokio::test]
    async fn test_logout_clears_session_even_when_backend_fails() {
        let transport = MockTransport::new(|request| {
            if request.url.ends_with(LOGOUT) {
                MockReply::fail("connection refused")
            } else {
                doctor_login_reply()
            }
        });
        let storage = Arc::new(MemoryStorage::new());
        let session = session(&transport, &storage);
        session.login("a@b.com", "secret123").await.unwrap();

        session.logout().await;

        assert_eq!(session.api().credentials(), None);
        assert_eq!(session.user(), None);
        assert_eq!(session.phase(), SessionPhase::Anonymous);
        assert_eq!(session.flags(), AuthFlags::default());
        assert!(storage.is_empty());

        let logout = &transport.requests_to(LOGOUT)[0];
        assert_eq!(logout.body, RequestBody::Json(json!({})));
        assert_eq!(logout.header("Authorization"), Some("Bearer AAA"));
    }

    #[tokio::test]
    async fn test_refresh_failure_returns_session_to_anonymous() {
        let transport = MockTransport::new(|request| {
            if request.url.ends_with(LOGIN) {
                doctor_login_reply()
            } else if request.url.ends_with(REFRESH) {
                MockReply::json(401, json!({"detail": "Token is invalid or expired"}))
            } else {
                MockReply::json(401, json!({"detail": "Given token not valid for any token type"}))
            }
        });
        let storage = Arc::new(MemoryStorage::new());
        let session = session(&transport, &storage);
        session.login("a@b.com", "secret123").await.unwrap();

        let err = session
            .api()
            .get::<Value>("/notes/", RequestOptions::new())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Given token not valid for any token type");
        assert!(!session.is_authenticated());
        assert_eq!(session.phase(), SessionPhase::Anonymous);
        assert_eq!(session.user(), None);
        assert_eq!(storage.get("auth_user").unwrap(), None);
    }

    #[tokio::test]
    async fn test_phase_is_authenticating_while_login_in_flight() {
        let transport = MockTransport::new(|_| doctor_login_reply().delayed(Duration::from_millis(40)));
        let storage = Arc::new(MemoryStorage::new());
        let session = session(&transport, &storage);

        let observe = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            session.snapshot()
        };
        let (login, during) = tokio::join!(session.login("a@b.com", "secret123"), observe);

        assert!(login.is_ok());
        assert_eq!(during.phase, SessionPhase::Authenticating);
        assert!(during.loading);
        assert_eq!(session.phase(), SessionPhase::Authenticated);
    }

    #[test]
    fn test_restores_session_from_storage() {
        let storage = Arc::new(MemoryStorage::new());
        store_json(storage.as_ref(), "tokens", Some(&Credentials::pair("AAA", Some("RRR".into())))).unwrap();
        store_json(
            storage.as_ref(),
            "auth_user",
            Some(&SessionUser::new(Some(3), "admin@clinic.example", Role::Admin)),
        )
        .unwrap();
        let transport = MockTransport::new(|_| MockReply::json(200, Value::Null));

        let session = session(&transport, &storage);

        assert_eq!(session.phase(), SessionPhase::Authenticated);
        assert!(session.is_admin());
    }

    #[test]
    fn test_orphan_user_without_credentials_is_dropped() {
        let storage = Arc::new(MemoryStorage::new());
        store_json(
            storage.as_ref(),
            "auth_user",
            Some(&SessionUser::new(Some(3), "p@b.com", Role::Patient)),
        )
        .unwrap();
        let transport = MockTransport::new(|_| MockReply::json(200, Value::Null));

        let session = session(&transport, &storage);

        assert_eq!(session.user(), None);
        assert!(!session.is_patient());
        assert_eq!(storage.get("auth_user").unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_user_cannot_change_role_of_live_session() {
        let storage = Arc::new(MemoryStorage::new());
        let transport = MockTransport::new(|_| {
            MockReply::json(
                200,
                json!({
                    "access": "PPP",
                    "refresh": "QQQ",
                    "user": {"id": 4, "email": "p@b.com", "role": "Patient"}
                }),
            )
        });
        let session = session(&transport, &storage);
        session.login("p@b.com", "secret123").await.unwrap();

        let err = session
            .set_user(Some(SessionUser::new(Some(4), "p@b.com", Role::Admin)))
            .unwrap_err();

        assert!(matches!(err, ApiError::Protocol(_)));
        assert!(session.is_patient());
        assert!(!session.is_admin());
        let stored: Option<SessionUser> = load_json(storage.as_ref(), "auth_user");
        assert_eq!(stored.map(|u| u.role), Some(Role::Patient));

        let mut renamed = SessionUser::new(Some(4), "p@b.com", Role::Patient);
        renamed.first_name = Some("Jiho".to_string());
        session.set_user(Some(renamed)).unwrap();
        assert_eq!(
            session.user().and_then(|u| u.first_name),
            Some("Jiho".to_string())
        );
    }

    #[test]
    fn test_set_user_persists_under_its_own_key() {
        let storage = Arc::new(MemoryStorage::new());
        let transport = MockTransport::new(|_| MockReply::json(200, Value::Null));
        let session = session(&transport, &storage);
        session
            .api()
            .set_credentials(Some(Credentials::bearer("TTT")))
            .unwrap();

        session
            .set_user(Some(SessionUser::new(Some(8), "dr@b.com", Role::Doctor)))
            .unwrap();

        assert!(session.is_doctor());
        let stored: Option<SessionUser> = load_json(storage.as_ref(), "auth_user");
        assert_eq!(stored.map(|u| u.email), Some("dr@b.com".to_string()));
        assert_eq!(
            load_json::<Credentials>(storage.as_ref(), "tokens"),
            Some(Credentials::bearer("TTT"))
        );

        session.set_user(None).unwrap();
        assert_eq!(storage.get("auth_user").unwrap(), None);
        assert!(session.is_authenticated());
        assert_eq!(session.phase(), SessionPhase::Anonymous);
    }
}
