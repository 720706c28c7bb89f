//! Mount handles
//!
//! A view mounts a loader and receives the latest [`LoadState`] through a
//! watch channel. Dropping the handle marks the view dead so a fetch that
//! completes afterwards does not publish into it; the cache is still filled.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use super::LoadState;

#[derive(Debug)]
pub struct Mounted<T> {
    rx: watch::Receiver<LoadState<T>>,
    alive: Arc<AtomicBool>,
}

impl<T> Mounted<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Publish `initial` and, if it is still loading, drive `load` on a
    /// detached task
    pub(crate) fn spawn<F>(initial: LoadState<T>, load: F) -> Self
    where
        F: Future<Output = LoadState<T>> + Send + 'static,
    {
        let needs_load = initial.is_loading;
        let (tx, rx) = watch::channel(initial);
        let alive = Arc::new(AtomicBool::new(true));

        if needs_load {
            let alive = Arc::clone(&alive);
            tokio::spawn(async move {
                let state = load.await;
                if alive.load(Ordering::Acquire) {
                    let _ = tx.send(state);
                } else {
                    debug!("View unmounted before load finished, dropping state");
                }
            });
        }

        Self { rx, alive }
    }

    /// The most recently published state
    pub fn current(&self) -> LoadState<T> {
        self.rx.borrow().clone()
    }

    /// Wait until the state is no longer loading
    pub async fn settled(&mut self) -> LoadState<T> {
        let settled = match self.rx.wait_for(|state| !state.is_loading).await {
            Ok(state) => Some(state.clone()),
            // Loader task ended without publishing
            Err(_) => None,
        };
        settled.unwrap_or_else(|| self.rx.borrow().clone())
    }
}

impl<T> Drop for Mounted<T> {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_ready_state_does_not_spawn() {
        let mut mounted = Mounted::spawn(LoadState::ready(1u32), async { LoadState::ready(2) });
        assert_eq!(mounted.settled().await.content, 1);
    }

    #[tokio::test]
    async fn test_settles_to_loaded_state() {
        let mut mounted = Mounted::spawn(LoadState::loading(0u32), async {
            tokio::task::yield_now().await;
            LoadState::ready(7)
        });
        assert!(mounted.current().is_loading);
        let state = mounted.settled().await;
        assert_eq!(state.content, 7);
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_view_still_runs_load() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&finished);
        let mounted = Mounted::spawn(LoadState::loading(0u32), async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            flag.store(true, Ordering::SeqCst);
            LoadState::ready(1)
        });
        drop(mounted);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_settled_when_task_ends_without_publishing() {
        let mut mounted = Mounted::spawn(LoadState::loading(0u32), async {
            Option::<LoadState<u32>>::None.expect("load aborted")
        });
        let state = mounted.settled().await;
        assert!(state.is_loading);
        assert_eq!(state.content, 0);
    }
}
