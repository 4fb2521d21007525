//! Scripted collaborators shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::{Article, Page, Source};
use crate::fetcher::{FetchError, NewsClient};

pub fn article(url: &str) -> Article {
    let mut article = Article::new(Source::new("Wire"));
    article.url = Some(url.to_string());
    article.title = Some(format!("Title of {}", url));
    article
}

pub fn page(urls: &[&str], total: u32) -> Page {
    Page {
        articles: urls.iter().map(|url| article(url)).collect(),
        status: "ok".to_string(),
        total_results: total,
    }
}

/// Replays queued responses in order and records every request as
/// `("listing:<region>" | "search:<term>", page)`.
#[derive(Default)]
pub struct MockClient {
    responses: Mutex<VecDeque<Result<Page, FetchError>>>,
    calls: Mutex<Vec<(String, u32)>>,
    gate: Option<Arc<Notify>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request waits for one `notify_one` on `gate` before answering.
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn push(&self, response: Result<Page, FetchError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn push_page(&self, urls: &[&str], total: u32) {
        self.push(Ok(page(urls, total)));
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }

    async fn respond(&self, request: String, page: u32) -> Result<Page, FetchError> {
        self.calls.lock().unwrap().push((request, page));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Transport("no scripted response".into())))
    }
}

#[async_trait]
impl NewsClient for MockClient {
    async fn listing(&self, region: &str, page: u32) -> Result<Page, FetchError> {
        self.respond(format!("listing:{}", region), page).await
    }

    async fn search(&self, term: &str, page: u32) -> Result<Page, FetchError> {
        self.respond(format!("search:{}", term), page).await
    }
}

/// Yield until `client` has seen at least `count` requests.
pub async fn wait_for_calls(client: &MockClient, count: usize) {
    while client.calls().len() < count {
        tokio::task::yield_now().await;
    }
}
