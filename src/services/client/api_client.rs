//! # 인증 HTTP 클라이언트
//!
//! 원격 API 호출에 bearer 자격 증명을 자동으로 붙이고,
//! 자격 증명 만료(401)를 한 번의 투명한 갱신으로 복구하는 클라이언트입니다.
//!
//! ## 401 재시도 프로토콜
//!
//! ```text
//! request ──► 401 ──► 진행 중인 갱신이 있나?
//!                       ├─ 없음: 갱신 작업 생성 (POST /authentication/refresh/ {refresh})
//!                       └─ 있음: 같은 작업을 기다림
//!                                  │
//!             ┌────────────────────┴───────────────────┐
//!          성공: 새 access 병합·저장                  실패: 자격 증명 전체 삭제
//!             │                                         │
//!          원 요청을 새 access 로 1회 재전송            원래의 401 실패를 호출자에게 전달
//!             │
//!          또 401 이면 그대로 실패 (추가 갱신 없음)
//! ```
//!
//! ## 에러 전파
//!
//! 모든 실패는 호출자에게 `ApiError`로 반환되는 동시에 공유 "마지막 에러" 값에 기록됩니다.
//! 타임아웃을 포함한 전송 계층 실패는 갱신 경로를 타지 않습니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! let client = ApiClient::with_reqwest(ClientSettings::from_env()?, Arc::new(FileStorage::new(".mediscope")))?;
//!
//! let page: serde_json::Value = client
//!     .get("/analyses/", RequestOptions::new().query("page_size", 10))
//!     .await?;
//!
//! let created: serde_json::Value = client
//!     .post("/notes/", &json!({"patient": 3, "content": "BP stable"}), RequestOptions::new())
//!     .await?;
//! ```

use std::sync::{Arc, PoisonError, RwLock, Weak};

use log::{debug, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::request_options::RequestOptions;
use super::request_status::RequestStatus;
use super::single_flight::SingleFlight;
use crate::config::{AuthPaths, ClientSettings};
use crate::domain::dto::RefreshPayload;
use crate::domain::models::credentials::{Credentials, RefreshGrant, TokenFields, bearer_header};
use crate::errors::{ApiError, ApiResult, ErrorContext};
use crate::storage::{Storage, load_json, store_json};
use crate::transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MultipartPayload, RequestBody,
    ReqwestTransport, TransportError,
};
use crate::utils::error_message::{GENERIC_FAILURE, extract_error_message, status_failure_message};

const AUTHORIZATION: &str = "Authorization";
const CONTENT_TYPE: &str = "Content-Type";

/// 인증 HTTP 클라이언트
///
/// 내부 상태는 `Arc`로 공유되므로 `clone()`은 같은 세션을 가리키는 핸들을 만듭니다.
/// 자격 증명(Credential Pair)은 이 클라이언트만 소유합니다.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    settings: ClientSettings,
    transport: Arc<dyn HttpTransport>,
    storage: Arc<dyn Storage>,
    credentials: RwLock<Option<Credentials>>,
    refresh: SingleFlight<Option<String>>,
    status: RequestStatus,
}

impl ApiClient {
    /// 전송 계층과 저장소를 주입해 클라이언트를 생성합니다.
    ///
    /// 저장소에 남아 있는 자격 증명이 있으면 복원합니다.
    pub fn new(
        settings: ClientSettings,
        transport: Arc<dyn HttpTransport>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        let credentials = load_json::<Credentials>(storage.as_ref(), &settings.tokens_key);
        if credentials.is_some() {
            info!("🔑 저장된 자격 증명 복원");
        }

        Self {
            inner: Arc::new(ClientInner {
                settings,
                transport,
                storage,
                credentials: RwLock::new(credentials),
                refresh: SingleFlight::new(),
                status: RequestStatus::new(),
            }),
        }
    }

    /// `reqwest` 전송 계층을 사용하는 클라이언트
    ///
    /// # Errors
    ///
    /// * `ApiError::Config` - HTTP 클라이언트 구성 실패
    pub fn with_reqwest(settings: ClientSettings, storage: Arc<dyn Storage>) -> ApiResult<Self> {
        let transport = Arc::new(ReqwestTransport::new()?);
        Ok(Self::new(settings, transport, storage))
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.inner.settings
    }

    pub fn base_url(&self) -> &str {
        self.inner.settings.base_url()
    }

    /// 세션 상태가 사용자 객체를 저장할 때 공유하는 저장소
    pub fn storage(&self) -> Arc<dyn Storage> {
        Arc::clone(&self.inner.storage)
    }

    // ---------------------------------------------------------------------
    // 자격 증명
    // ---------------------------------------------------------------------

    pub fn credentials(&self) -> Option<Credentials> {
        self.inner.current_credentials()
    }

    /// 자격 증명이 존재하는지 확인
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// 자격 증명을 통째로 교체합니다. `None`은 삭제입니다.
    ///
    /// 메모리 상태를 먼저 바꾸고 저장소를 동기화합니다.
    ///
    /// # Errors
    ///
    /// * `ApiError::Storage` - 저장소 동기화 실패 (메모리 상태는 이미 교체됨)
    pub fn set_credentials(&self, credentials: Option<Credentials>) -> ApiResult<()> {
        self.inner.replace_credentials(credentials)
    }

    pub fn clear_credentials(&self) -> ApiResult<()> {
        self.set_credentials(None)
    }

    /// 액세스 값만 교체합니다.
    ///
    /// 현재 표현이 쌍이면 리프레시 토큰을 유지하고, 그 외에는 단일 토큰으로 저장합니다.
    pub fn set_access_token(&self, access: Option<String>) -> ApiResult<()> {
        let next = access.map(|access| match self.credentials() {
            Some(current) => current.with_access(access),
            None => Credentials::bearer(access),
        });
        self.set_credentials(next)
    }

    // ---------------------------------------------------------------------
    // 요청 상태
    // ---------------------------------------------------------------------

    /// 진행 중인 요청이 하나라도 있는지 확인
    pub fn is_loading(&self) -> bool {
        self.inner.status.is_loading()
    }

    pub fn outstanding_requests(&self) -> usize {
        self.inner.status.outstanding()
    }

    /// 가장 최근 실패의 사용자용 메시지
    pub fn last_error(&self) -> Option<String> {
        self.inner.status.last_error()
    }

    pub fn clear_error(&self) {
        self.inner.status.clear_error();
    }

    pub(crate) fn record_error(&self, error: &ApiError) {
        self.inner.status.record_error(&error.to_string());
    }

    // ---------------------------------------------------------------------
    // HTTP 동사
    // ---------------------------------------------------------------------

    pub async fn get<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> ApiResult<T> {
        self.request(HttpMethod::Get, path, RequestBody::Empty, options)
            .await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B, options: RequestOptions) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = self.json_body(body)?;
        self.request(HttpMethod::Post, path, body, options).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B, options: RequestOptions) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = self.json_body(body)?;
        self.request(HttpMethod::Put, path, body, options).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B, options: RequestOptions) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = self.json_body(body)?;
        self.request(HttpMethod::Patch, path, body, options).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> ApiResult<T> {
        self.request(HttpMethod::Delete, path, RequestBody::Empty, options)
            .await
    }

    /// 멀티파트 파일 업로드
    pub async fn upload<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        payload: MultipartPayload,
        options: RequestOptions,
    ) -> ApiResult<T> {
        self.request(method, path, RequestBody::Multipart(payload), options)
            .await
    }

    /// 범용 요청
    ///
    /// 로딩 카운터와 마지막 에러를 갱신하며, 401 재시도 프로토콜을 적용합니다.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: RequestBody,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let _loading = self.inner.status.begin();

        let result = self
            .dispatch(method, path, body, options)
            .await
            .and_then(|value| serde_json::from_value(value).decode_context("응답 본문 해석 실패"));

        if let Err(e) = &result {
            debug!("❌ {} {} 실패: {}", method, path, e);
            self.record_error(e);
        }
        result
    }

    fn json_body<B: Serialize + ?Sized>(&self, body: &B) -> ApiResult<RequestBody> {
        serde_json::to_value(body)
            .map(RequestBody::Json)
            .decode_context("요청 본문 직렬화 실패")
            .inspect_err(|e| self.record_error(e))
    }

    async fn dispatch(
        &self,
        method: HttpMethod,
        path: &str,
        body: RequestBody,
        options: RequestOptions,
    ) -> ApiResult<Value> {
        let request = self.build_request(method, path, body, options);
        debug!("➡️ {} {}", method, request.url);

        let response = self.send(request.clone(), None).await?;
        if response.status != 401 {
            return into_result(response);
        }

        info!("🔐 401 응답, 토큰 갱신 후 재시도: {} {}", method, path);
        match self.refresh_access().await {
            Some(access) => {
                let retried = self.send(request, Some(access.as_str())).await?;
                if retried.status == 401 {
                    warn!("⚠️ 갱신 후 재시도에도 401: {} {}", method, path);
                }
                into_result(retried)
            }
            None => Err(status_error(response)),
        }
    }

    fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: RequestBody,
        options: RequestOptions,
    ) -> HttpRequest {
        let mut request = HttpRequest::new(method, self.inner.settings.url_for(path)).with_body(body);
        request.headers = options.headers;
        request.query = options.query;
        request.timeout = options.timeout.or(self.inner.settings.timeout);

        if matches!(request.body, RequestBody::Json(_)) && request.header(CONTENT_TYPE).is_none() {
            request.set_header(CONTENT_TYPE, "application/json");
        }
        request
    }

    /// 자격 증명을 붙여 전송합니다.
    ///
    /// `access`가 주어지면 (갱신 직후 재시도) 그 값을, 아니면 현재 자격 증명을 사용합니다.
    /// 자격 증명 헤더는 호출자가 넣은 `Authorization` 헤더보다 우선합니다.
    async fn send(&self, mut request: HttpRequest, access: Option<&str>) -> ApiResult<HttpResponse> {
        let header = match access {
            Some(access) => Some(bearer_header(access)),
            None => self.credentials().map(|c| c.authorization_header()),
        };
        if let Some(header) = header {
            request.set_header(AUTHORIZATION, header);
        }

        self.inner
            .transport
            .execute(request)
            .await
            .map_err(transport_error)
    }

    /// 단일 비행 토큰 갱신
    ///
    /// 동시에 401을 받은 모든 요청이 같은 갱신 작업을 기다립니다.
    async fn refresh_access(&self) -> Option<String> {
        let inner: Weak<ClientInner> = Arc::downgrade(&self.inner);
        self.inner
            .refresh
            .run(move || async move {
                match inner.upgrade() {
                    Some(inner) => inner.perform_refresh().await,
                    None => None,
                }
            })
            .await
    }
}

impl ClientInner {
    fn current_credentials(&self) -> Option<Credentials> {
        self.credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace_credentials(&self, next: Option<Credentials>) -> ApiResult<()> {
        *self.credentials.write().unwrap_or_else(PoisonError::into_inner) = next.clone();

        store_json(self.storage.as_ref(), &self.settings.tokens_key, next.as_ref()).inspect_err(|e| {
            warn!("⚠️ 자격 증명 저장소 동기화 실패: {}", e);
        })
    }

    /// 저장소 실패는 `replace_credentials`에서 로그로 남습니다.
    fn discard_credentials(&self) {
        let _ = self.replace_credentials(None);
    }

    async fn perform_refresh(&self) -> Option<String> {
        let refresh = self
            .current_credentials()
            .and_then(|c| c.refresh_token().map(str::to_string));

        let Some(refresh) = refresh else {
            warn!("⚠️ 리프레시 토큰 없음: 자격 증명 삭제");
            self.discard_credentials();
            return None;
        };

        info!("🔄 액세스 토큰 갱신 요청");
        let result = self.request_refresh(&refresh).await;

        // 갱신 도중 로그아웃이나 새 로그인으로 세션이 바뀌었다면 그 세션은 건드리지 않습니다.
        let current = match self.current_credentials() {
            Some(current) if current.refresh_token() == Some(refresh.as_str()) => current,
            _ => {
                warn!("⚠️ 갱신 중 세션이 교체됨: 갱신 결과 폐기");
                return None;
            }
        };

        let grant = match result {
            Ok(grant) => grant,
            Err(e) => {
                warn!("⚠️ 토큰 갱신 실패 ({}): 자격 증명 삭제", e);
                self.discard_credentials();
                return None;
            }
        };

        let next = current.refreshed(&grant);
        let access = next.access_token().to_string();
        let _ = self.replace_credentials(Some(next));

        info!("✅ 액세스 토큰 갱신 완료");
        Some(access)
    }

    /// 갱신 엔드포인트 호출
    ///
    /// 전송 계층을 직접 사용하므로 갱신 요청 자체의 401은 재귀적인 갱신을 일으키지 않습니다.
    async fn request_refresh(&self, refresh: &str) -> ApiResult<RefreshGrant> {
        let body = serde_json::to_value(RefreshPayload { refresh }).decode_context("갱신 요청 직렬화 실패")?;

        let mut request = HttpRequest::new(HttpMethod::Post, self.settings.url_for(AuthPaths::REFRESH))
            .with_body(RequestBody::Json(body));
        request.set_header(CONTENT_TYPE, "application/json");
        request.timeout = self.settings.timeout;

        let response = self.transport.execute(request).await.map_err(transport_error)?;
        if !response.is_success() {
            return Err(status_error(response));
        }

        serde_json::from_value::<TokenFields>(response.body)
            .decode_context("갱신 응답 해석 실패")?
            .into_refresh_grant()
    }
}

fn into_result(response: HttpResponse) -> ApiResult<Value> {
    if response.is_success() {
        Ok(response.body)
    } else {
        Err(status_error(response))
    }
}

fn status_error(response: HttpResponse) -> ApiError {
    let message =
        extract_error_message(&response.body).unwrap_or_else(|| status_failure_message(response.status));

    ApiError::Status {
        status: response.status,
        message,
        body: response.body,
    }
}

fn transport_error(e: TransportError) -> ApiError {
    let message = if e.message.trim().is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        e.message
    };

    ApiError::Transport {
        message,
        timed_out: e.timed_out,
    }
}
