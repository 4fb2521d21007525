pub mod sqlite;

use tokio::sync::watch;

use crate::app::Result;
use crate::domain::Article;

pub use sqlite::SqliteStore;

/// Saved-article persistence.
///
/// Every operation is atomic on its own. Writes replace on conflict, so
/// concurrent saves of the same article resolve to the last one submitted.
pub trait Store {
    /// Insert or replace an article, returning its row id.
    fn upsert_article(&self, article: &Article) -> Result<i64>;
    fn get_saved_articles(&self) -> Result<Vec<Article>>;
    fn get_article_by_url(&self, url: &str) -> Result<Option<Article>>;
    fn delete_article(&self, article: &Article) -> Result<()>;

    /// Current saved list, re-published after every write.
    fn subscribe(&self) -> watch::Receiver<Vec<Article>>;
}
