use crate::domain::{Article, FeedSnapshot, Page};

/// Pages merged so far for one feed, plus the cursor for the next request.
#[derive(Debug, Clone)]
pub struct FeedCache {
    accumulated: Vec<Article>,
    next_page: u32,
    total_results: Option<u32>,
    last_query: Option<String>,
}

impl Default for FeedCache {
    fn default() -> Self {
        Self {
            accumulated: Vec::new(),
            next_page: 1,
            total_results: None,
            last_query: None,
        }
    }
}

impl FeedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accumulated(&self) -> &[Article] {
        &self.accumulated
    }

    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    pub fn total_results(&self) -> Option<u32> {
        self.total_results
    }

    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    /// Record `query` as the active one. Returns true when the cache was
    /// reset because the query changed.
    pub fn begin_query(&mut self, query: &str, reset_on_change: bool) -> bool {
        if self.last_query.as_deref() == Some(query) {
            return false;
        }

        let reset = reset_on_change && self.last_query.is_some();
        if reset {
            self.clear();
        }
        self.last_query = Some(query.to_string());
        reset
    }

    /// Merge a successfully fetched page and advance the cursor.
    ///
    /// The first page of a session replaces whatever was held; later pages
    /// are appended in order, duplicates included.
    pub fn merge(&mut self, page: Page) {
        if self.next_page == 1 {
            self.accumulated = page.articles;
        } else {
            self.accumulated.extend(page.articles);
        }
        self.total_results = Some(page.total_results);
        self.next_page += 1;
    }

    /// Whether the feed has run past the last page the server can have.
    ///
    /// One page beyond `ceil(total / page_size)` is still requested because
    /// the server's total can under-count.
    pub fn is_last_page(&self, page_size: u32) -> bool {
        match self.total_results {
            Some(total) => self.next_page > total.div_ceil(page_size.max(1)) + 1,
            None => false,
        }
    }

    /// Drop accumulated pages and rewind the cursor. The query is kept.
    pub fn clear(&mut self) {
        self.accumulated = Vec::new();
        self.next_page = 1;
        self.total_results = None;
    }

    pub fn snapshot(&self, page_size: u32) -> FeedSnapshot {
        FeedSnapshot {
            articles: self.accumulated.clone(),
            total_results: self.total_results,
            is_last_page: self.is_last_page(page_size),
        }
    }
}
