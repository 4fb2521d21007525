pub mod http_fetcher;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{FeedError, Page};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Failure of a single remote query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a complete response.
    #[error("transport error: {0}")]
    Transport(String),

    /// A response arrived but was not a page.
    #[error("decode error: {0}")]
    Decode(String),

    /// A well-formed response reporting a non-success status.
    #[error("{0}")]
    Server(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            FetchError::Decode(value.to_string())
        } else {
            FetchError::Transport(value.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(value: serde_json::Error) -> Self {
        FetchError::Decode(value.to_string())
    }
}

impl From<FetchError> for FeedError {
    fn from(value: FetchError) -> Self {
        match value {
            FetchError::Transport(_) => FeedError::NetworkFailure,
            FetchError::Decode(_) => FeedError::DecodeFailure,
            FetchError::Server(message) => FeedError::ServerError(message),
        }
    }
}

/// The two remote queries a feed can be backed by. Pages are 1-based.
#[async_trait]
pub trait NewsClient {
    async fn listing(&self, region: &str, page: u32) -> Result<Page, FetchError>;

    async fn search(&self, term: &str, page: u32) -> Result<Page, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_maps_to_feed_error() {
        assert_eq!(
            FeedError::from(FetchError::Transport("reset".into())),
            FeedError::NetworkFailure
        );
        assert_eq!(
            FeedError::from(FetchError::Decode("eof".into())),
            FeedError::DecodeFailure
        );
        assert_eq!(
            FeedError::from(FetchError::Server("Too Many Requests".into())),
            FeedError::ServerError("Too Many Requests".into())
        );
    }

    #[test]
    fn test_serde_error_is_decode() {
        let err = serde_json::from_str::<Page>("{").unwrap_err();
        assert!(matches!(FetchError::from(err), FetchError::Decode(_)));
    }
}
