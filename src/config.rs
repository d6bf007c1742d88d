//! Defaults, prompt template, and run-time settings.
//!
//! Settings are split in three:
//! - [`Credentials`]: API keys, validated eagerly at construction
//! - [`AgentSettings`]: knobs that stay fixed for the lifetime of a [`crate::agent::NewsAgent`]
//! - [`DailyNewsRequest`]: per-call parameters of `get_daily_news`

use crate::error::{Error, Result};
use std::time::Duration;

pub const DEFAULT_CATEGORY: &str = "business";
pub const DEFAULT_PAGE_SIZE: usize = 5;
pub const DEFAULT_MAX_RETRIES: usize = 10;
pub const DEFAULT_MAX_HASHTAGS: usize = 5;
/// Characters of article text sent to the model.
pub const DEFAULT_TEXT_MAX_LENGTH: usize = 16_000;
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_COUNTRY: &str = "us";
/// Upper bound the headline API accepts for a single page.
pub const API_PAGE_SIZE_LIMIT: usize = 100;
pub const CACHE_SIZE: usize = 128;
pub const BACKFILL_BATCH_SIZE: usize = 20;
pub const DEFAULT_CONCURRENCY: usize = 4;

pub const SOURCE_TIMEOUT: Duration = Duration::from_secs(10);
pub const EXTRACT_TIMEOUT: Duration = Duration::from_secs(15);
pub const SUMMARIZE_TIMEOUT: Duration = Duration::from_secs(60);

pub const NEWS_API_BASE: &str = "https://newsapi.org/v2/";

pub const NO_TITLE: &str = "No title available";
pub const UNKNOWN_SOURCE: &str = "Unknown source";
pub const NO_SUMMARY: &str = "No summary available";
pub const NO_CONTENT: &str = "No content available";
pub const SUMMARY_FAILED: &str = "Summary generation failed";

/// Prompt sent to the model. `{text}` is replaced with the (truncated) article.
pub const SHORT_VIDEO_PROMPT_TEMPLATE: &str = "\
You write scripts for short-form news videos aimed at a young audience.
Summarize the news article below in 3-4 short, easy-to-follow sentences.
- Keep it conversational and lightly witty, but stick to the facts in the article.
- Lead with the main point and leave out minor details.
- It will be read aloud, so write for the ear.
- No hashtags, no emojis.
- Return only the summary text.

Article:
{text}
";

/// API keys for the two external services.
#[derive(Clone)]
pub struct Credentials {
    pub news_api_key: String,
    pub model_api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("news_api_key", &"<redacted>")
            .field("model_api_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Validate both keys, failing on the first one that is missing or blank.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] naming the missing variable.
    pub fn resolve(news_api_key: Option<String>, model_api_key: Option<String>) -> Result<Self> {
        let news_api_key = news_api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                Error::Configuration("NEWS_API_KEY environment variable is required".into())
            })?;
        let model_api_key = model_api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                Error::Configuration("MODEL_API_KEY environment variable is required".into())
            })?;

        Ok(Self {
            news_api_key,
            model_api_key,
        })
    }
}

/// Orchestrator knobs that do not change between calls.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    /// Headlines requested per backfill round.
    pub backfill_batch_size: usize,
    pub max_hashtags: usize,
    /// Articles processed at once.
    pub max_concurrency: usize,
    /// Deadline for a single extraction, on top of the HTTP client's own timeout.
    pub extract_timeout: Duration,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            backfill_batch_size: BACKFILL_BATCH_SIZE,
            max_hashtags: DEFAULT_MAX_HASHTAGS,
            max_concurrency: DEFAULT_CONCURRENCY,
            extract_timeout: EXTRACT_TIMEOUT,
        }
    }
}

/// Parameters for one `get_daily_news` call.
///
/// `DailyNewsRequest::default()` asks for five business articles with model
/// summaries and a backfill budget of ten extra candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyNewsRequest {
    pub category: String,
    pub use_model_summary: bool,
    /// Number of successfully processed articles wanted.
    pub page_size: usize,
    /// Maximum number of backfill candidates to attempt.
    pub max_retries: usize,
    pub language: String,
    pub country: String,
}

impl Default for DailyNewsRequest {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            use_model_summary: true,
            page_size: DEFAULT_PAGE_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            language: DEFAULT_LANGUAGE.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl DailyNewsRequest {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Self::default()
        }
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn use_model_summary(mut self, enabled: bool) -> Self {
        self.use_model_summary = enabled;
        self
    }

    pub fn region(mut self, language: impl Into<String>, country: impl Into<String>) -> Self {
        self.language = language.into();
        self.country = country.into();
        self
    }
}
