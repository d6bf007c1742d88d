//! Data models for headlines, extracted content, and finished articles.
//!
//! - [`HeadlineRecord`]: Raw candidate returned by a headline source
//! - [`ArticleContent`]: Text, keywords, and extractive summary for one URL
//! - [`NewsArticle`]: A processed, ready-to-publish item
//! - [`DailyNews`]: One run's worth of articles, as written to disk

use crate::utils::classify_time;
use chrono::Local;
use serde::{Deserialize, Serialize};

/// A candidate headline as returned by a [`crate::sources::HeadlineSource`].
///
/// Every field is optional because upstream listing APIs routinely omit them;
/// the orchestrator fills in placeholders when it builds a [`NewsArticle`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HeadlineRecord {
    pub title: Option<String>,
    /// Display name of the publisher (e.g. "Reuters").
    pub source_name: Option<String>,
    /// Publication timestamp exactly as the source reported it.
    pub published_at: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

impl HeadlineRecord {
    /// The record's URL, if present and not blank.
    pub fn url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// The description, if present and not blank.
    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

/// Content extracted from a single article page.
///
/// Instances are shared through the extraction cache as `Arc<ArticleContent>`
/// and never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleContent {
    /// Plain article body text, paragraphs separated by blank lines.
    pub text: String,
    /// Keywords ordered by relevance, most relevant first.
    pub keywords: Vec<String>,
    /// Extractive summary built from the article's own sentences.
    pub summary: String,
    /// The URL the content was extracted from.
    pub url: String,
}

/// A processed news item ready for publishing.
///
/// # JSON Schema
///
/// Serializes as `{title, summary, source, publishedAt, hashtags, url}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    /// Model-generated summary, extractive summary, or the headline description.
    pub summary: String,
    /// Publisher display name.
    pub source: String,
    pub published_at: String,
    /// Hashtags, category tag first.
    pub hashtags: Vec<String>,
    pub url: String,
}

/// A collection of processed articles for a single run.
///
/// # Edition Naming
///
/// The `time_of_day` field categorizes editions as:
/// - `"morning"`: 00:00 - 08:00
/// - `"afternoon"`: 08:00 - 16:00
/// - `"evening"`: 16:00 - 24:00
#[derive(Debug, Deserialize, Serialize)]
pub struct DailyNews {
    /// The date of the run in `YYYY-MM-DD` format.
    pub local_date: String,
    /// The time of day category: "morning", "afternoon", or "evening".
    pub time_of_day: String,
    /// The exact local time of the run.
    pub local_time: String,
    /// The category the headlines were fetched for.
    pub category: String,
    pub articles: Vec<NewsArticle>,
}

impl DailyNews {
    /// Stamp `articles` with the current local date, time and edition name.
    pub fn new(category: impl Into<String>, articles: Vec<NewsArticle>) -> Self {
        let now = Local::now();
        Self {
            local_date: now.date_naive().to_string(),
            time_of_day: classify_time(now.time()).to_string(),
            local_time: now.time().format("%H:%M:%S").to_string(),
            category: category.into(),
            articles,
        }
    }
}
