//! Error taxonomy for the daily news pipeline.
//!
//! Only [`Error::Configuration`] and [`Error::SourceFetch`] ever reach a caller
//! of [`crate::agent::NewsAgent::get_daily_news`]. Every per-article problem is
//! absorbed inside the orchestrator and reported as a [`SkipReason`] in the logs.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid credentials / settings. Raised at construction time.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The initial headline fetch failed.
    #[error("Failed to fetch headlines: {0}")]
    SourceFetch(String),

    /// A single article could not be downloaded or parsed.
    #[error("Could not process article from {url}: {reason}")]
    ContentExtraction { url: String, reason: String },

    /// The generative model call failed or returned something unusable.
    #[error("Summary generation failed: {0}")]
    Summarization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn extraction(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::ContentExtraction {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

/// Why a headline did not become a [`crate::models::NewsArticle`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("headline has no URL")]
    MissingUrl,

    #[error("URL was already processed in this run")]
    AlreadyProcessed,

    #[error("no content: {reason}")]
    NoContent { reason: String },

    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

pub type Result<T> = std::result::Result<T, Error>;
