pub mod article;
pub mod page;
pub mod state;

pub use article::{Article, Source};
pub use page::{ApiErrorBody, Page};
pub use state::{FeedError, FeedSnapshot, FeedState};
