use thiserror::Error;

use crate::domain::Article;

/// Why a feed request did not produce a page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("No internet connection")]
    NoConnection,

    #[error("Network Failure")]
    NetworkFailure,

    #[error("Conversion Error")]
    DecodeFailure,

    #[error("{0}")]
    ServerError(String),
}

/// Lifecycle of the latest request made on a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState<T> {
    Loading,
    Success(T),
    Error { error: FeedError, data: Option<T> },
}

impl<T> FeedState<T> {
    pub fn error(error: FeedError) -> Self {
        FeedState::Error { error, data: None }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FeedState::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FeedState::Success(_))
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }

    /// Payload of the state, including stale data kept by an error.
    pub fn data(&self) -> Option<&T> {
        match self {
            FeedState::Loading => None,
            FeedState::Success(data) => Some(data),
            FeedState::Error { data, .. } => data.as_ref(),
        }
    }

    pub fn message(&self) -> Option<String> {
        match self {
            FeedState::Error { error, .. } => Some(error.to_string()),
            FeedState::Loading | FeedState::Success(_) => None,
        }
    }
}

/// Accumulated view of a feed handed to observers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSnapshot {
    pub articles: Vec<Article>,
    pub total_results: Option<u32>,
    /// No further page will be requested until the feed is restarted.
    pub is_last_page: bool,
}

impl FeedSnapshot {
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}
