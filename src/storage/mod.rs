//! 영구 세션 저장소 계층
//!
//! 브라우저 local storage에 해당하는 문자열 키/값 저장소 추상화와
//! JSON 기반 객체 직렬화 헬퍼를 제공합니다.
//!
//! # 주요 기능
//!
//! - [`Storage`] trait - 저장소 구현체가 제공해야 하는 최소 연산 (get/set/remove)
//! - [`FileStorage`] - 키마다 JSON 파일 하나를 쓰는 디스크 저장소 (CLI 재실행 간 유지)
//! - [`MemoryStorage`] - 프로세스 메모리 저장소 (테스트, 임베딩 용도)
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use mediscope_client::storage::{load_json, store_json, FileStorage};
//!
//! let storage = FileStorage::new(".mediscope");
//! store_json(&storage, "auth_user", Some(&user))?;
//! let cached: Option<SessionUser> = load_json(&storage, "auth_user");
//! store_json::<SessionUser>(&storage, "auth_user", None)?; // 삭제
//! ```
//!
//! 자격 증명과 세션 사용자는 서로 다른 키에 독립적으로 저장됩니다.

pub mod file_storage;
pub mod memory_storage;

use log::warn;
use serde::{Serialize, de::DeserializeOwned};

use crate::errors::{ApiResult, ErrorContext};

pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;

/// 문자열 키/값 영구 저장소
pub trait Storage: Send + Sync {
    /// 키에 저장된 값을 조회합니다. 없으면 `Ok(None)`.
    fn get(&self, key: &str) -> ApiResult<Option<String>>;

    /// 키에 값을 저장합니다. 기존 값은 덮어씁니다.
    fn set(&self, key: &str, value: &str) -> ApiResult<()>;

    /// 키를 삭제합니다. 없는 키 삭제는 성공으로 취급합니다.
    fn remove(&self, key: &str) -> ApiResult<()>;
}

/// JSON 으로 저장된 값을 읽어 역직렬화합니다.
///
/// 손상된 항목은 경고 로그를 남기고 삭제한 뒤 없는 것으로 취급합니다.
pub fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("⚠️ 저장소 읽기 실패 ({}): {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("⚠️ 손상된 저장 항목 제거 ({}): {}", key, e);
            if let Err(e) = storage.remove(key) {
                warn!("⚠️ 손상된 항목 삭제 실패 ({}): {}", key, e);
            }
            None
        }
    }
}

/// 값을 JSON 으로 저장하거나, `None`이면 키를 삭제합니다.
pub fn store_json<T: Serialize>(storage: &dyn Storage, key: &str, value: Option<&T>) -> ApiResult<()> {
    match value {
        Some(value) => {
            let raw = serde_json::to_string(value).storage_context(key)?;
            storage.set(key, &raw)
        }
        None => storage.remove(key),
    }
}
