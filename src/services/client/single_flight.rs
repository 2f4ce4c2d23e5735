//! 단일 비행(single-flight) 비동기 작업 슬롯
//!
//! 최대 하나의 진행 중 작업 핸들을 담는 뮤텍스 보호 슬롯입니다.
//! 작업이 없으면 새로 만들고(get-or-create), 이미 있으면 모든 호출자가
//! 같은 작업의 결과를 함께 기다립니다. 작업이 끝나면 성공/실패와 관계없이
//! 슬롯이 비워지므로, 이후 호출은 새 작업을 시작합니다.
//!
//! ```text
//! caller A ──┐  slot: None → Some(shared) ──► operation ──► slot: None
//! caller B ──┤  slot: Some(shared) (clone)        │
//! caller C ──┘  slot: Some(shared) (clone)        ▼
//!                                    A, B, C 모두 같은 결과 수신
//! ```

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use log::debug;

type Slot<T> = Arc<Mutex<Option<Shared<BoxFuture<'static, T>>>>>;

/// 단일 비행 슬롯
pub struct SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    slot: Slot<T>,
}

impl<T> Default for SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// 진행 중인 작업이 있으면 그 결과를, 없으면 `make`로 새 작업을 만들어 결과를 기다립니다.
    ///
    /// `make`는 슬롯이 비어 있을 때만 호출됩니다.
    pub async fn run<F, Fut>(&self, make: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let operation = {
            let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some(existing) => {
                    debug!("진행 중인 작업에 합류");
                    existing.clone()
                }
                None => {
                    let release = Arc::clone(&self.slot);
                    let work = make();
                    let operation = async move {
                        let output = work.await;
                        release.lock().unwrap_or_else(PoisonError::into_inner).take();
                        output
                    }
                    .boxed()
                    .shared();
                    *slot = Some(operation.clone());
                    operation
                }
            }
        };

        operation.await
    }

    /// 작업이 진행 중인지 확인
    pub fn in_flight(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_callers_share_one_operation() {
        let flight = SingleFlight::<Option<String>>::new();
        let started = Arc::new(AtomicUsize::new(0));

        let call = || {
            let started = Arc::clone(&started);
            flight.run(move || async move {
                started.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                Some("NEW".to_string())
            })
        };

        let (a, b, c) = tokio::join!(call(), call(), call());

        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(a.as_deref(), Some("NEW"));
        assert_eq!(b, a);
        assert_eq!(c, a);
        assert!(!flight.in_flight());
    }

    #[tokio::test]
    async fn test_slot_is_cleared_after_settling_so_next_call_starts_fresh() {
        let flight = SingleFlight::<u32>::new();
        let started = Arc::new(AtomicUsize::new(0));

        for expected in 1..=2 {
            let counter = Arc::clone(&started);
            let value = flight
                .run(move || async move { counter.fetch_add(1, Ordering::SeqCst) as u32 + 1 })
                .await;
            assert_eq!(value, expected);
        }

        assert_eq!(started.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_operation_also_clears_slot() {
        let flight = SingleFlight::<Option<String>>::new();

        let first = flight.run(|| async { None }).await;
        assert_eq!(first, None);
        assert!(!flight.in_flight());

        let second = flight.run(|| async { Some("OK".to_string()) }).await;
        assert_eq!(second.as_deref(), Some("OK"));
    }
}
