use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::connectivity::ConnectivityProbe;
use crate::domain::{FeedError, FeedSnapshot, FeedState};
use crate::feed::cache::FeedCache;
use crate::fetcher::{FetchError, NewsClient};

pub type FeedStateReceiver = watch::Receiver<FeedState<FeedSnapshot>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    /// Headline listing for a region. One pagination session per controller.
    BreakingNews,
    /// Keyword search. A new term starts a new session.
    Search,
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedKind::BreakingNews => write!(f, "breaking-news"),
            FeedKind::Search => write!(f, "search"),
        }
    }
}

/// Busy flag held for the duration of one fetch. Released on drop, so a
/// cancelled fetch frees the feed too.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs the fetch, merge and emit cycle of a single feed.
pub struct PaginatedFeedController {
    kind: FeedKind,
    client: Arc<dyn NewsClient + Send + Sync>,
    probe: Arc<dyn ConnectivityProbe + Send + Sync>,
    page_size: u32,
    cache: Mutex<FeedCache>,
    in_flight: AtomicBool,
    state_tx: watch::Sender<FeedState<FeedSnapshot>>,
}

impl PaginatedFeedController {
    pub fn new(
        kind: FeedKind,
        client: Arc<dyn NewsClient + Send + Sync>,
        probe: Arc<dyn ConnectivityProbe + Send + Sync>,
        page_size: u32,
    ) -> Self {
        let (state_tx, _) = watch::channel(FeedState::Success(FeedSnapshot::default()));
        Self {
            kind,
            client,
            probe,
            page_size,
            cache: Mutex::new(FeedCache::new()),
            in_flight: AtomicBool::new(false),
            state_tx,
        }
    }

    pub fn kind(&self) -> FeedKind {
        self.kind
    }

    /// Latest-value stream of this feed's state. The current state is
    /// visible immediately through `borrow()`.
    pub fn subscribe(&self) -> FeedStateReceiver {
        self.state_tx.subscribe()
    }

    pub fn current(&self) -> FeedState<FeedSnapshot> {
        self.state_tx.borrow().clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn is_last_page(&self) -> bool {
        self.cache().is_last_page(self.page_size)
    }

    pub fn next_page(&self) -> u32 {
        self.cache().next_page()
    }

    pub fn last_query(&self) -> Option<String> {
        self.cache().last_query().map(String::from)
    }

    /// Start or resume the feed with `query`.
    ///
    /// A changed search term resets the accumulated pages first. Returns the
    /// terminal state emitted, or `None` when a fetch was already in flight.
    pub async fn start(&self, query: &str) -> Option<FeedState<FeedSnapshot>> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("{} feed busy, dropping start({})", self.kind, query);
            return None;
        };

        let reset = self
            .cache()
            .begin_query(query, self.kind == FeedKind::Search);
        if reset {
            info!("{} feed reset for new query {:?}", self.kind, query);
        }

        Some(self.run(query.to_string()).await)
    }

    /// Fetch the next page of the current query.
    ///
    /// Does nothing while a fetch is in flight, once the last page has been
    /// reached, or before the feed was ever started.
    pub async fn fetch_next(&self) -> Option<FeedState<FeedSnapshot>> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("{} feed busy, dropping fetch_next", self.kind);
            return None;
        };

        let query = {
            let cache = self.cache();
            if cache.is_last_page(self.page_size) {
                debug!("{} feed already at its last page", self.kind);
                return None;
            }
            match cache.last_query() {
                Some(query) => query.to_string(),
                None => {
                    debug!("{} feed not started yet", self.kind);
                    return None;
                }
            }
        };

        Some(self.run(query).await)
    }

    /// Forget every fetched page and the active query.
    ///
    /// A fetch still in flight finishes without touching the released cache.
    pub fn release(&self) {
        *self.cache() = FeedCache::new();
        self.emit(FeedState::Success(FeedSnapshot::default()));
        debug!("{} feed released", self.kind);
    }

    async fn run(&self, query: String) -> FeedState<FeedSnapshot> {
        self.emit(FeedState::Loading);

        if !self.probe.is_reachable() {
            warn!("{} feed: no connectivity, skipping request", self.kind);
            let state = FeedState::error(FeedError::NoConnection);
            self.emit(state.clone());
            return state;
        }

        let page_number = self.cache().next_page();
        debug!("{} feed requesting page {} for {:?}", self.kind, page_number, query);

        let result = match self.kind {
            FeedKind::BreakingNews => self.client.listing(&query, page_number).await,
            FeedKind::Search => self.client.search(&query, page_number).await,
        };

        let state = match result {
            Ok(page) => {
                let mut cache = self.cache();
                let stale = cache.last_query() != Some(query.as_str())
                    || cache.next_page() != page_number;

                if stale {
                    debug!("{} feed changed during fetch, discarding page", self.kind);
                } else if self.state_tx.receiver_count() == 0 {
                    debug!("{} feed has no subscribers, releasing cache", self.kind);
                    *cache = FeedCache::new();
                } else {
                    info!(
                        "{} feed merged page {} ({} articles, {} total)",
                        self.kind,
                        page_number,
                        page.articles.len(),
                        page.total_results
                    );
                    cache.merge(page);
                }
                FeedState::Success(cache.snapshot(self.page_size))
            }
            Err(FetchError::Server(message)) => {
                warn!("{} feed server error: {}", self.kind, message);
                FeedState::Error {
                    error: FeedError::ServerError(message),
                    data: Some(self.cache().snapshot(self.page_size)),
                }
            }
            Err(e) => {
                warn!("{} feed request failed: {}", self.kind, e);
                FeedState::error(e.into())
            }
        };

        self.emit(state.clone());
        state
    }

    fn emit(&self, state: FeedState<FeedSnapshot>) {
        self.state_tx.send_replace(state);
    }

    fn cache(&self) -> MutexGuard<'_, FeedCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
