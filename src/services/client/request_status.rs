//! 요청 진행 상태 (로딩 카운터, 마지막 에러)
//!
//! UI가 표시하는 공유 "로딩" 표시와 "마지막 에러" 값을 관리합니다.
//! 로딩은 불리언이 아니라 진행 중인 요청 수를 세는 카운터이므로,
//! 동시에 진행되는 요청 중 마지막 요청이 끝날 때까지 로딩 상태가 유지됩니다.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// 공유 요청 상태
#[derive(Debug, Default)]
pub struct RequestStatus {
    outstanding: AtomicUsize,
    last_error: Mutex<Option<String>>,
}

impl RequestStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 요청 시작. 마지막 에러를 지우고 카운터를 올립니다.
    ///
    /// 반환된 가드가 drop 되는 시점에 카운터가 내려가므로,
    /// 호출 future가 중간에 취소되어도 카운터가 새지 않습니다.
    pub fn begin(&self) -> LoadingGuard<'_> {
        self.clear_error();
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        LoadingGuard { status: self }
    }

    pub fn is_loading(&self) -> bool {
        self.outstanding() > 0
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    pub fn record_error(&self, message: &str) {
        *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.to_string());
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear_error(&self) {
        *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// 진행 중인 요청 하나를 나타내는 가드
#[derive(Debug)]
pub struct LoadingGuard<'a> {
    status: &'a RequestStatus,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.status.outstanding.fetch_sub(1, Ordering::SeqCst);
    }
}
