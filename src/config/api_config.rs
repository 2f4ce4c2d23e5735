//! API 연결 및 세션 저장소 설정 관리 모듈
//!
//! 원격 API 주소, 요청 타임아웃, 세션 저장 위치 등 클라이언트 설정을 관리합니다.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{ApiError, ApiResult};

/// 로컬 개발용 기본 API 주소
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// 자격 증명(토큰) 저장 키 기본값
pub const DEFAULT_TOKENS_KEY: &str = "tokens";

/// 세션 사용자 저장 키 기본값
pub const DEFAULT_USER_KEY: &str = "auth_user";

/// 인증 관련 엔드포인트 경로
///
/// 모든 경로는 설정된 base URL 기준의 상대 경로입니다.
pub struct AuthPaths;

impl AuthPaths {
    pub const LOGIN: &'static str = "/authentication/knock/knock/";
    pub const SIGNUP: &'static str = "/authentication/signup/";
    pub const LOGOUT: &'static str = "/authentication/logout/";
    pub const REFRESH: &'static str = "/authentication/refresh/";
}

/// 환경 변수 기반 API 설정
pub struct ApiConfig;

impl ApiConfig {
    /// 원격 API의 base URL을 반환합니다.
    ///
    /// # Environment Variables
    ///
    /// - `API_BASE_URL`: 기본값 `http://127.0.0.1:8000`
    pub fn base_url() -> String {
        env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
    }

    /// 요청 단위 타임아웃을 반환합니다.
    ///
    /// `API_TIMEOUT_SECS`가 없거나 0 이하, 숫자가 아니면 타임아웃을 두지 않습니다.
    pub fn timeout() -> Option<Duration> {
        Self::parse_timeout(env::var("API_TIMEOUT_SECS").ok().as_deref())
    }

    /// 타임아웃 문자열 해석
    pub fn parse_timeout(raw: Option<&str>) -> Option<Duration> {
        let secs = raw?.trim().parse::<u64>().ok()?;
        if secs == 0 {
            return None;
        }
        Some(Duration::from_secs(secs))
    }

    /// 세션 파일이 저장될 디렉터리
    ///
    /// - `SESSION_STORAGE_DIR`: 기본값 `.mediscope`
    pub fn storage_dir() -> PathBuf {
        PathBuf::from(env::var("SESSION_STORAGE_DIR").unwrap_or_else(|_| ".mediscope".to_string()))
    }

    /// 자격 증명 저장 키 (`TOKENS_STORAGE_KEY`)
    pub fn tokens_key() -> String {
        env::var("TOKENS_STORAGE_KEY").unwrap_or_else(|_| DEFAULT_TOKENS_KEY.to_string())
    }

    /// 세션 사용자 저장 키 (`USER_STORAGE_KEY`)
    pub fn user_key() -> String {
        env::var("USER_STORAGE_KEY").unwrap_or_else(|_| DEFAULT_USER_KEY.to_string())
    }
}

/// 클라이언트에 주입되는 구체화된 설정값
///
/// 전역 상태 대신 이 구조체를 생성해 [`crate::services::client::ApiClient`]에 전달합니다.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    base_url: String,
    pub timeout: Option<Duration>,
    pub tokens_key: String,
    pub user_key: String,
}

impl ClientSettings {
    /// 주어진 base URL로 설정을 생성합니다.
    ///
    /// # Errors
    ///
    /// * `ApiError::Config` - 비어 있거나 http(s) 스킴이 아닌 URL
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            timeout: None,
            tokens_key: DEFAULT_TOKENS_KEY.to_string(),
            user_key: DEFAULT_USER_KEY.to_string(),
        })
    }

    /// 환경 변수에서 설정을 읽어옵니다.
    pub fn from_env() -> ApiResult<Self> {
        Self::from_env_with_base_url(&ApiConfig::base_url())
    }

    /// base URL만 직접 지정하고 나머지(타임아웃, 저장 키)는 환경 변수에서 읽습니다.
    ///
    /// `API_BASE_URL` 값은 읽지 않으므로 잘못된 환경 값이 명시적 지정을 막지 않습니다.
    pub fn from_env_with_base_url(base_url: &str) -> ApiResult<Self> {
        let mut settings = Self::new(base_url)?;
        settings.timeout = ApiConfig::timeout();
        settings.tokens_key = ApiConfig::tokens_key();
        settings.user_key = ApiConfig::user_key();
        Ok(settings)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_storage_keys(mut self, tokens_key: &str, user_key: &str) -> Self {
        self.tokens_key = tokens_key.to_string();
        self.user_key = user_key.to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// base URL과 상대 경로를 결합합니다.
    ///
    /// `"/analyses/"`와 `"analyses/"` 모두 같은 URL이 됩니다.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(raw: &str) -> ApiResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ApiError::Config("API base URL이 비어 있습니다".to_string()));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ApiError::Config(format!(
            "API base URL은 http:// 또는 https:// 로 시작해야 합니다: {}",
            trimmed
        )));
    }
    Ok(trimmed.to_string())
}
