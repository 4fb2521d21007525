use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: Option<String>,
    pub name: String,
}

impl Source {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Rebuild a source from the name column of a saved row.
    ///
    /// Only the name is persisted, so the id is reconstructed from it and
    /// whatever id the remote side originally sent is lost.
    pub fn from_stored_name(name: String) -> Self {
        Self {
            id: Some(name.clone()),
            name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Row id in the local store. Remote articles never carry one.
    #[serde(skip)]
    pub id: Option<i64>,
    pub author: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub published_at: Option<String>,
    pub source: Source,
    pub title: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
}

impl Article {
    pub fn new(source: Source) -> Self {
        Self {
            id: None,
            author: None,
            content: None,
            description: None,
            published_at: None,
            source,
            title: None,
            url: None,
            url_to_image: None,
        }
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(Untitled)")
    }

    pub fn published_at_utc(&self) -> Option<DateTime<Utc>> {
        self.published_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Same remote article, regardless of whether either copy was saved.
    pub fn same_url(&self, other: &Article) -> bool {
        matches!((&self.url, &other.url), (Some(a), Some(b)) if a == b)
    }
}
