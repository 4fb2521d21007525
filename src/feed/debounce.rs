use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::feed::controller::PaginatedFeedController;

#[derive(Default)]
struct Pending {
    /// Bumped by every notify and cancel. A timer only dispatches if the
    /// generation it was armed with is still current.
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// Turns a burst of search inputs into one search per pause in typing.
///
/// Must be used from within a tokio runtime.
pub struct SearchDebouncer {
    controller: Arc<PaginatedFeedController>,
    delay: Duration,
    pending: Arc<Mutex<Pending>>,
}

impl SearchDebouncer {
    pub fn new(controller: Arc<PaginatedFeedController>, delay: Duration) -> Self {
        Self {
            controller,
            delay,
            pending: Arc::new(Mutex::new(Pending::default())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `start(term)` after the quiet interval, replacing any
    /// search still waiting. Blank input only cancels.
    pub fn notify(&self, term: &str) {
        let mut pending = lock(&self.pending);
        Self::disarm(&mut pending);

        if term.trim().is_empty() {
            debug!("Blank search input, nothing scheduled");
            return;
        }

        let generation = pending.generation;
        let shared = Arc::clone(&self.pending);
        let controller = Arc::clone(&self.controller);
        let delay = self.delay;
        let term = term.to_string();

        pending.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut pending = lock(&shared);
                if pending.generation != generation {
                    return;
                }
                pending.timer = None;
            }
            debug!("Search input settled on {:?}", term);
            controller.start(&term).await;
        }));
    }

    /// Drop the waiting search, if any. Once this returns the search will
    /// not be dispatched. Calling it again is harmless.
    pub fn cancel(&self) {
        Self::disarm(&mut lock(&self.pending));
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.pending).timer.is_some()
    }

    fn disarm(pending: &mut Pending) {
        pending.generation += 1;
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn lock(pending: &Mutex<Pending>) -> MutexGuard<'_, Pending> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}
