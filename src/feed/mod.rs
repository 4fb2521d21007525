pub mod cache;
pub mod controller;
pub mod coordinator;
pub mod debounce;

pub use cache::FeedCache;
pub use controller::{FeedKind, FeedStateReceiver, PaginatedFeedController};
pub use coordinator::FeedCoordinator;
pub use debounce::SearchDebouncer;
