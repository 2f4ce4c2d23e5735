//! 프로세스 메모리 저장소

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::Storage;
use crate::errors::ApiResult;

/// `HashMap` 기반 저장소
///
/// 프로세스가 끝나면 내용이 사라집니다. 테스트와 라이브러리 임베딩에 사용합니다.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 키 개수
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> ApiResult<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ApiResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ApiResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_independent() {
        let storage = MemoryStorage::new();
        storage.set("tokens", "a").unwrap();
        storage.set("auth_user", "b").unwrap();

        storage.remove("tokens").unwrap();

        assert_eq!(storage.get("tokens").unwrap(), None);
        assert_eq!(storage.get("auth_user").unwrap().as_deref(), Some("b"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let storage = MemoryStorage::new();

        assert!(storage.remove("nothing").is_ok());
        assert!(storage.is_empty());
    }
}
