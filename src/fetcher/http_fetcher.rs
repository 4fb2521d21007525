use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use url::Url;

use crate::app::Result;
use crate::config::ApiConfig;
use crate::domain::{ApiErrorBody, Page};
use crate::fetcher::{FetchError, NewsClient};

const API_KEY_HEADER: &str = "x-api-key";
const LISTING_PATH: &str = "v2/top-headlines";
const SEARCH_PATH: &str = "v2/everything";

pub struct HttpNewsClient {
    client: Client,
    base_url: Url,
    page_size: u32,
}

impl HttpNewsClient {
    pub fn new(config: &ApiConfig, page_size: u32) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            if let Ok(mut value) = HeaderValue::from_str(key) {
                value.set_sensitive(true);
                headers.insert(API_KEY_HEADER, value);
            }
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(&config.base_url)?,
            page_size,
        })
    }

    pub fn listing_url(&self, region: &str, page: u32) -> Result<Url> {
        self.page_url(LISTING_PATH, ("country", region), page)
    }

    pub fn search_url(&self, term: &str, page: u32) -> Result<Url> {
        self.page_url(SEARCH_PATH, ("q", term), page)
    }

    fn page_url(&self, path: &str, filter: (&str, &str), page: u32) -> Result<Url> {
        let mut url = self.base_url.join(path)?;
        url.query_pairs_mut()
            .append_pair(filter.0, filter.1)
            .append_pair("page", &page.to_string())
            .append_pair("pageSize", &self.page_size.to_string());
        Ok(url)
    }

    async fn get_page(&self, url: Url) -> std::result::Result<Page, FetchError> {
        tracing::debug!("GET {}", url.path());
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        parse_response(status, &body)
    }
}

/// Turn a raw response into a page, classifying every failure.
pub fn parse_response(status: StatusCode, body: &[u8]) -> std::result::Result<Page, FetchError> {
    if !status.is_success() {
        let message = serde_json::from_slice::<ApiErrorBody>(body)
            .ok()
            .and_then(|e| e.message)
            .or_else(|| status.canonical_reason().map(String::from))
            .unwrap_or_else(|| status.to_string());
        return Err(FetchError::Server(message));
    }

    let page: Page = serde_json::from_slice(body)?;
    if !page.is_ok() {
        return Err(FetchError::Server(format!(
            "Unexpected response status: {}",
            page.status
        )));
    }

    Ok(page)
}

#[async_trait]
impl NewsClient for HttpNewsClient {
    async fn listing(&self, region: &str, page: u32) -> std::result::Result<Page, FetchError> {
        let url = self
            .listing_url(region, page)
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        self.get_page(url).await
    }

    async fn search(&self, term: &str, page: u32) -> std::result::Result<Page, FetchError> {
        let url = self
            .search_url(term, page)
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        self.get_page(url).await
    }
}
