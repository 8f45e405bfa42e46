//! Error types for Cashflow

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The text-generation collaborator failed or returned nothing usable.
    /// Fatal to the request, safe for the caller to retry.
    #[error("Text generation failed: {0}")]
    Generation(String),
}

impl Error {
    /// True when the failure came from the text-generation collaborator
    /// (including transport errors talking to it)
    pub fn is_generation_failure(&self) -> bool {
        matches!(self, Error::Generation(_) | Error::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
