use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};
use tokio::sync::watch;

use crate::app::{NewsdeskError, Result};
use crate::domain::{Article, Source};
use crate::store::Store;

const ARTICLE_COLUMNS: &str =
    "id, author, content, description, published_at, source_name, title, url, url_to_image";

pub struct SqliteStore {
    conn: Mutex<Connection>,
    saved_tx: watch::Sender<Vec<Article>>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let (saved_tx, _) = watch::channel(Vec::new());
        let store = Self {
            conn: Mutex::new(conn),
            saved_tx,
        };
        store.run_migrations()?;

        let conn = store.lock()?;
        store.saved_tx.send_replace(Self::query_all(&conn)?);
        drop(conn);

        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;
        migrations.to_latest(&mut conn)?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| NewsdeskError::LockPoisoned(e.to_string()))
    }

    fn row_to_article(row: &Row<'_>) -> rusqlite::Result<Article> {
        Ok(Article {
            id: row.get(0)?,
            author: row.get(1)?,
            content: row.get(2)?,
            description: row.get(3)?,
            published_at: row.get(4)?,
            source: Source::from_stored_name(row.get(5)?),
            title: row.get(6)?,
            url: row.get(7)?,
            url_to_image: row.get(8)?,
        })
    }

    fn query_all(conn: &Connection) -> Result<Vec<Article>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM articles ORDER BY id",
            ARTICLE_COLUMNS
        ))?;

        let articles = stmt
            .query_map([], Self::row_to_article)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(articles)
    }

    /// Push the current list to subscribers. Called with the lock held so
    /// publications follow write order.
    fn publish(&self, conn: &Connection) -> Result<()> {
        let articles = Self::query_all(conn)?;
        self.saved_tx.send_replace(articles);
        Ok(())
    }
}

impl Store for SqliteStore {
    fn upsert_article(&self, article: &Article) -> Result<i64> {
        let conn = self.lock()?;

        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO articles ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                ARTICLE_COLUMNS
            ),
            params![
                article.id,
                article.author,
                article.content,
                article.description,
                article.published_at,
                article.source.name,
                article.title,
                article.url,
                article.url_to_image
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!("Saved article {} ({})", id, article.display_title());

        self.publish(&conn)?;
        Ok(id)
    }

    fn get_saved_articles(&self) -> Result<Vec<Article>> {
        let conn = self.lock()?;
        Self::query_all(&conn)
    }

    fn get_article_by_url(&self, url: &str) -> Result<Option<Article>> {
        let conn = self.lock()?;

        let result = conn
            .query_row(
                &format!("SELECT {} FROM articles WHERE url = ?1", ARTICLE_COLUMNS),
                params![url],
                Self::row_to_article,
            )
            .optional()?;

        Ok(result)
    }

    fn delete_article(&self, article: &Article) -> Result<()> {
        let conn = self.lock()?;

        let deleted = match (article.id, article.url.as_deref()) {
            (Some(id), _) => conn.execute("DELETE FROM articles WHERE id = ?1", params![id])?,
            (None, Some(url)) => conn.execute("DELETE FROM articles WHERE url = ?1", params![url])?,
            (None, None) => {
                return Err(NewsdeskError::ArticleNotFound(
                    article.display_title().to_string(),
                ))
            }
        };

        if deleted == 0 {
            tracing::debug!("Delete of {} matched no saved row", article.display_title());
        }

        self.publish(&conn)?;
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Vec<Article>> {
        self.saved_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(url: &str, title: &str) -> Article {
        let mut article = Article::new(Source {
            id: Some("wire-id".into()),
            name: "Wire".into(),
        });
        article.url = Some(url.into());
        article.title = Some(title.into());
        article.author = Some("A. Writer".into());
        article.content = Some("content".into());
        article.description = Some("description".into());
        article.published_at = Some("2024-03-01T12:30:00Z".into());
        article.url_to_image = Some(format!("{}.png", url));
        article
    }

    #[test]
    fn test_save_then_list_round_trip() {
        let store = SqliteStore::in_memory().unwrap();
        let original = article("https://example.com/a", "A");
        let id = store.upsert_article(&original).unwrap();

        let saved = store.get_saved_articles().unwrap();
        assert_eq!(saved.len(), 1);

        let mut expected = original.clone();
        expected.id = Some(id);
        expected.source = Source {
            id: Some("Wire".into()),
            name: "Wire".into(),
        };
        assert_eq!(saved[0], expected);
    }

    #[test]
    fn test_source_id_is_not_preserved() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .upsert_article(&article("https://example.com/a", "A"))
            .unwrap();

        let saved = store.get_saved_articles().unwrap();
        assert_eq!(saved[0].source.name, "Wire");
        assert_ne!(saved[0].source.id.as_deref(), Some("wire-id"));
    }

    #[test]
    fn test_upsert_same_url_replaces() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .upsert_article(&article("https://example.com/a", "Old"))
            .unwrap();
        store
            .upsert_article(&article("https://example.com/a", "New"))
            .unwrap();

        let saved = store.get_saved_articles().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].title.as_deref(), Some("New"));
    }

    #[test]
    fn test_upsert_with_id_replaces_row() {
        let store = SqliteStore::in_memory().unwrap();
        let id = store
            .upsert_article(&article("https://example.com/a", "A"))
            .unwrap();

        let mut edited = store.get_saved_articles().unwrap().remove(0);
        edited.title = Some("Edited".into());
        let same_id = store.upsert_article(&edited).unwrap();

        assert_eq!(id, same_id);
        let saved = store.get_saved_articles().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].title.as_deref(), Some("Edited"));
    }

    #[test]
    fn test_articles_without_url_are_kept_apart() {
        let store = SqliteStore::in_memory().unwrap();
        let bare = Article::new(Source::new("Wire"));
        store.upsert_article(&bare).unwrap();
        store.upsert_article(&bare).unwrap();

        assert_eq!(store.get_saved_articles().unwrap().len(), 2);
    }

    #[test]
    fn test_listing_keeps_insertion_order() {
        let store = SqliteStore::in_memory().unwrap();
        for (i, url) in ["https://c", "https://a", "https://b"].iter().enumerate() {
            store.upsert_article(&article(url, &i.to_string())).unwrap();
        }

        let urls: Vec<_> = store
            .get_saved_articles()
            .unwrap()
            .into_iter()
            .filter_map(|a| a.url)
            .collect();
        assert_eq!(urls, vec!["https://c", "https://a", "https://b"]);
    }

    #[test]
    fn test_delete_by_id() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .upsert_article(&article("https://example.com/a", "A"))
            .unwrap();
        store
            .upsert_article(&article("https://example.com/b", "B"))
            .unwrap();

        let first = store.get_saved_articles().unwrap().remove(0);
        store.delete_article(&first).unwrap();

        let saved = store.get_saved_articles().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].url.as_deref(), Some("https://example.com/b"));
    }

    #[test]
    fn test_delete_remote_copy_by_url() {
        let store = SqliteStore::in_memory().unwrap();
        let remote = article("https://example.com/a", "A");
        store.upsert_article(&remote).unwrap();

        store.delete_article(&remote).unwrap();
        assert!(store.get_saved_articles().unwrap().is_empty());
        assert!(store
            .get_article_by_url("https://example.com/a")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .delete_article(&article("https://example.com/missing", "M"))
            .unwrap();
    }

    #[test]
    fn test_delete_without_key_fails() {
        let store = SqliteStore::in_memory().unwrap();
        let err = store
            .delete_article(&Article::new(Source::new("Wire")))
            .unwrap_err();
        assert!(matches!(err, NewsdeskError::ArticleNotFound(_)));
    }

    #[test]
    fn test_subscribe_sees_every_write() {
        let store = SqliteStore::in_memory().unwrap();
        let mut rx = store.subscribe();
        assert!(rx.borrow_and_update().is_empty());

        let a = article("https://example.com/a", "A");
        store.upsert_article(&a).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);

        store.delete_article(&a).unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_empty());
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.db");

        {
            let store = SqliteStore::new(&path).unwrap();
            store
                .upsert_article(&article("https://example.com/a", "A"))
                .unwrap();
        }

        let reopened = SqliteStore::new(&path).unwrap();
        assert_eq!(reopened.get_saved_articles().unwrap().len(), 1);
        assert_eq!(reopened.subscribe().borrow().len(), 1);
    }
}
