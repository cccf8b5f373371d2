//! Bounded concurrency gate for upstream calls.
//!
//! Wraps a fair [`tokio::sync::Semaphore`]: waiters acquire permits in the
//! order they asked, so queued tasks are released FIFO as slots free up.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::Error;

/// Default number of simultaneous upstream calls.
pub const DEFAULT_CAPACITY: usize = 5;

/// Shared gate limiting how many tasks run their body at once.
///
/// Cloning is cheap and clones share the same slots.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl ConcurrencyLimiter {
    /// Create a gate with `capacity` slots.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if `capacity` is 0 or exceeds the
    /// semaphore's permit limit.
    pub fn new(capacity: usize) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::InvalidConfig("concurrency capacity must be at least 1".into()));
        }
        if capacity > Semaphore::MAX_PERMITS {
            return Err(Error::InvalidConfig(format!("concurrency capacity {capacity} is too large")));
        }
        Ok(Self { semaphore: Arc::new(Semaphore::new(capacity)), capacity })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots not currently held by a running task.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Run `task` once a slot is free, holding the slot until it finishes.
    ///
    /// The task's output is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Error::LimiterClosed` if the gate was closed while waiting.
    pub async fn run<F, T>(&self, task: F) -> Result<T, Error>
    where
        F: Future<Output = T>,
    {
        let _permit = self.semaphore.acquire().await.map_err(|_| Error::LimiterClosed)?;
        Ok(task.await)
    }

    /// Stop admitting tasks. Waiting and future `run` calls fail with
    /// `Error::LimiterClosed`; running tasks finish normally.
    pub fn close(&self) {
        self.semaphore.close();
    }
}

impl Default for ConcurrencyLimiter {
    fn default() -> Self {
        Self { semaphore: Arc::new(Semaphore::new(DEFAULT_CAPACITY)), capacity: DEFAULT_CAPACITY }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::task::JoinSet;

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(ConcurrencyLimiter::new(0), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_default_capacity() {
        let limiter = ConcurrencyLimiter::default();
        assert_eq!(limiter.capacity(), 5);
        assert_eq!(limiter.available(), 5);
    }

    #[tokio::test]
    async fn test_propagates_task_output() {
        let limiter = ConcurrencyLimiter::new(1).unwrap();
        let ok: Result<u32, String> = limiter.run(async { Ok(7) }).await.unwrap();
        assert_eq!(ok, Ok(7));

        let err: Result<u32, String> = limiter.run(async { Err("boom".to_string()) }).await.unwrap();
        assert_eq!(err, Err("boom".to_string()));
        assert_eq!(limiter.available(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_never_exceeds_capacity() {
        const CAPACITY: usize = 3;
        const TASKS: usize = 20;

        let limiter = ConcurrencyLimiter::new(CAPACITY).unwrap();
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(AtomicUsize::new(0));

        let mut join_set = JoinSet::new();
        for _ in 0..TASKS {
            let limiter = limiter.clone();
            let running = running.clone();
            let peak = peak.clone();
            let completed = completed.clone();
            join_set.spawn(async move {
                limiter
                    .run(async {
                        let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        running.fetch_sub(1, Ordering::SeqCst);
                        completed.fetch_add(1, Ordering::SeqCst);
                    })
                    .await
                    .unwrap();
            });
        }

        while let Some(res) = join_set.join_next().await {
            res.unwrap();
        }

        assert_eq!(completed.load(Ordering::SeqCst), TASKS);
        assert!(peak.load(Ordering::SeqCst) <= CAPACITY);
        assert_eq!(limiter.available(), CAPACITY);
    }

    #[tokio::test]
    async fn test_waiters_released_in_submission_order() {
        let limiter = ConcurrencyLimiter::new(1).unwrap();
        let order = Arc::new(Mutex::new(Vec::new()));

        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
        let holder = {
            let limiter = limiter.clone();
            tokio::spawn(async move {
                limiter
                    .run(async {
                        let _ = release_rx.await;
                    })
                    .await
                    .unwrap();
            })
        };
        while limiter.available() != 0 {
            tokio::task::yield_now().await;
        }

        let mut waiters = Vec::new();
        for i in 0..5 {
            let limiter = limiter.clone();
            let order = order.clone();
            waiters.push(tokio::spawn(async move {
                limiter.run(async { order.lock().unwrap().push(i) }).await.unwrap();
            }));
            // Let the task reach the semaphore queue before spawning the next.
            for _ in 0..10 {
                tokio::task::yield_now().await;
            }
        }

        release_tx.send(()).unwrap();
        holder.await.unwrap();
        for waiter in waiters {
            waiter.await.unwrap();
        }

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_closed_limiter_rejects() {
        let limiter = ConcurrencyLimiter::new(2).unwrap();
        limiter.close();
        let result = limiter.run(async { 1 }).await;
        assert!(matches!(result, Err(Error::LimiterClosed)));
    }
}
