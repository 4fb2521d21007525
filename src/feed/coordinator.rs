use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

use crate::app::Result;
use crate::connectivity::ConnectivityProbe;
use crate::domain::{Article, FeedSnapshot, FeedState};
use crate::feed::controller::{FeedKind, FeedStateReceiver, PaginatedFeedController};
use crate::feed::debounce::SearchDebouncer;
use crate::fetcher::NewsClient;
use crate::store::Store;

/// Single entry point for callers: both feeds plus the saved articles.
pub struct FeedCoordinator<S: Store> {
    breaking_news: Arc<PaginatedFeedController>,
    search: Arc<PaginatedFeedController>,
    debouncer: SearchDebouncer,
    store: Arc<S>,
    region: String,
}

impl<S: Store> FeedCoordinator<S> {
    pub fn new(
        client: Arc<dyn NewsClient + Send + Sync>,
        probe: Arc<dyn ConnectivityProbe + Send + Sync>,
        store: Arc<S>,
        region: impl Into<String>,
        page_size: u32,
        search_delay: Duration,
    ) -> Self {
        let breaking_news = Arc::new(PaginatedFeedController::new(
            FeedKind::BreakingNews,
            client.clone(),
            probe.clone(),
            page_size,
        ));
        let search = Arc::new(PaginatedFeedController::new(
            FeedKind::Search,
            client,
            probe,
            page_size,
        ));
        let debouncer = SearchDebouncer::new(search.clone(), search_delay);

        Self {
            breaking_news,
            search,
            debouncer,
            store,
            region: region.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn breaking_news(&self) -> &PaginatedFeedController {
        &self.breaking_news
    }

    pub fn search_feed(&self) -> &PaginatedFeedController {
        &self.search
    }

    // Breaking news

    pub fn observe_breaking_news(&self) -> FeedStateReceiver {
        self.breaking_news.subscribe()
    }

    /// Fetch the first page of headlines, or resume the running session.
    pub async fn fetch_breaking_news(&self) -> Option<FeedState<FeedSnapshot>> {
        self.breaking_news.start(&self.region).await
    }

    pub async fn load_more_breaking_news(&self) -> Option<FeedState<FeedSnapshot>> {
        self.breaking_news.fetch_next().await
    }

    // Search

    pub fn observe_search(&self) -> FeedStateReceiver {
        self.search.subscribe()
    }

    /// Debounced search for typed input.
    pub fn search(&self, term: &str) {
        self.debouncer.notify(term);
    }

    /// Search right away, bypassing the debounce timer.
    pub async fn search_now(&self, term: &str) -> Option<FeedState<FeedSnapshot>> {
        self.debouncer.cancel();
        if term.trim().is_empty() {
            return None;
        }
        self.search.start(term).await
    }

    pub async fn load_more_search(&self) -> Option<FeedState<FeedSnapshot>> {
        self.search.fetch_next().await
    }

    pub fn cancel_search(&self) {
        self.debouncer.cancel();
    }

    /// Drop pending input and the search results held for a closed search view.
    pub fn close_search(&self) {
        self.debouncer.cancel();
        self.search.release();
    }

    // Saved articles

    pub fn save(&self, article: &Article) -> Result<i64> {
        let id = self.store.upsert_article(article)?;
        info!("Saved article {:?}", article.display_title());
        Ok(id)
    }

    pub fn remove(&self, article: &Article) -> Result<()> {
        self.store.delete_article(article)?;
        info!("Removed saved article {:?}", article.display_title());
        Ok(())
    }

    pub fn saved(&self) -> Result<Vec<Article>> {
        self.store.get_saved_articles()
    }

    pub fn find_saved(&self, url: &str) -> Result<Option<Article>> {
        self.store.get_article_by_url(url)
    }

    pub fn is_saved(&self, url: &str) -> Result<bool> {
        Ok(self.find_saved(url)?.is_some())
    }

    /// Saved list, re-sent in full after every save or removal.
    pub fn observe_saved(&self) -> watch::Receiver<Vec<Article>> {
        self.store.subscribe()
    }
}
