//! 디스크 기반 저장소
//!
//! 키 하나당 `<dir>/<key>.json` 파일 하나를 사용합니다.
//! 쓰기는 임시 파일에 기록한 뒤 rename 하여 중간 상태의 파일이 남지 않게 합니다.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

use super::Storage;
use crate::errors::{ApiError, ApiResult, ErrorContext};

/// 파일 시스템 저장소
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// 디렉터리는 첫 쓰기 시점에 생성됩니다.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> ApiResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(ApiError::Storage(format!("허용되지 않는 저장 키: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> ApiResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ApiError::Storage(format!("{} 읽기 실패: {}", path.display(), e))),
        }
    }

    fn set(&self, key: &str, value: &str) -> ApiResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).storage_context("저장소 디렉터리 생성 실패")?;

        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, value).storage_context("임시 파일 쓰기 실패")?;
        fs::rename(&tmp, &path).storage_context("저장 파일 교체 실패")?;

        debug!("💾 저장소 항목 기록: {}", path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> ApiResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("🗑️ 저장소 항목 삭제: {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::Storage(format!("{} 삭제 실패: {}", path.display(), e))),
        }
    }
}
