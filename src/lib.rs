//! # newsdesk
//!
//! Client-side access layer for a paginated news API: headline and search
//! feeds that grow page by page, observable request state, and a local list
//! of saved articles that works offline.
//!
//! ## Architecture
//!
//! ```text
//! caller → FeedCoordinator → PaginatedFeedController → {ConnectivityProbe, NewsClient}
//!                │                     └─ FeedCache (merge) → watch<FeedState>
//!                └─ Store (saved articles) → watch<Vec<Article>>
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Top headlines, two pages
//! newsdesk headlines --pages 2
//!
//! # Search and save the third result
//! newsdesk search "rust language" --save 3
//!
//! # Saved articles
//! newsdesk saved
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// config, store, client, connectivity probe, coordinator.
pub mod app;

/// Command-line interface using clap.
///
/// - `headlines` - Top headlines for a region
/// - `search <term>` - Keyword search
/// - `prompt` - Interactive, debounced search
/// - `saved` - List saved articles
/// - `remove <url>` - Remove a saved article
pub mod cli;

/// Configuration loaded from `~/.config/newsdesk/config.toml`.
pub mod config;

/// Network reachability checks that never block on the network.
pub mod connectivity;

/// Core domain models.
///
/// - [`Article`](domain::Article) and [`Source`](domain::Source)
/// - [`Page`](domain::Page): one API response
/// - [`FeedState`](domain::FeedState): Loading / Success / Error
pub mod domain;

/// Paginated feeds.
///
/// - [`FeedCache`](feed::FeedCache): merged pages and the page cursor
/// - [`PaginatedFeedController`](feed::PaginatedFeedController): fetch, merge, emit
/// - [`SearchDebouncer`](feed::SearchDebouncer): one search per pause in typing
/// - [`FeedCoordinator`](feed::FeedCoordinator): façade for callers
pub mod feed;

/// Remote news API.
///
/// - [`NewsClient`](fetcher::NewsClient): Async trait for the listing and search queries
/// - [`HttpNewsClient`](fetcher::http_fetcher::HttpNewsClient): reqwest-based implementation
pub mod fetcher;

/// SQLite persistence for saved articles.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;
