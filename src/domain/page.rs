use serde::{Deserialize, Serialize};

use crate::domain::Article;

pub const STATUS_OK: &str = "ok";

/// One response of the listing or search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub articles: Vec<Article>,
    pub status: String,
    /// Server-side estimate of the whole result set, not `articles.len()`.
    pub total_results: u32,
}

impl Page {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Error body returned alongside non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub status: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_page() {
        let body = r#"{
            "status": "ok",
            "totalResults": 45,
            "articles": [
                {"source": {"id": null, "name": "A"}, "title": "one", "url": "https://a/1"},
                {"source": {"id": null, "name": "B"}, "title": "two", "url": "https://b/2"}
            ]
        }"#;
        let page: Page = serde_json::from_str(body).unwrap();
        assert!(page.is_ok());
        assert_eq!(page.total_results, 45);
        assert_eq!(page.articles.len(), 2);
        assert_eq!(page.articles[1].title.as_deref(), Some("two"));
    }

    #[test]
    fn test_decode_page_missing_total_fails() {
        let body = r#"{"status": "ok", "articles": []}"#;
        assert!(serde_json::from_str::<Page>(body).is_err());
    }

    #[test]
    fn test_decode_error_body() {
        let body = r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#;
        let err: ApiErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(err.code.as_deref(), Some("apiKeyInvalid"));
        assert_eq!(err.message.as_deref(), Some("Your API key is invalid."));
    }
}
