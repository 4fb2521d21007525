use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum NewsdeskError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] rusqlite_migration::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Article not found: {0}")]
    ArticleNotFound(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, NewsdeskError>;
