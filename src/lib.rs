//! # Daily News
//!
//! Builds a short daily digest of news articles for one category: headlines
//! come from a news listing API, each article page is downloaded and parsed,
//! summarized by a generative model (or extractively), and tagged with
//! hashtags.
//!
//! ## Architecture
//!
//! The pipeline is assembled from three collaborators, each behind a trait:
//!
//! 1. **Headlines**: [`sources::HeadlineSource`] lists candidate articles
//! 2. **Extraction**: [`extract::ContentExtractor`] turns a URL into text,
//!    keywords and an extractive summary
//! 3. **Summaries**: [`summarizer::Summarizer`] condenses article text
//!
//! [`agent::NewsAgent`] drives them and backfills with fresh headlines until
//! it has the number of articles requested or its retry budget runs out.
//!
//! ```ignore
//! let credentials = Credentials::resolve(news_key, model_key)?;
//! let agent = DefaultNewsAgent::from_credentials(
//!     &credentials, NEWS_API_BASE, None, AgentSettings::default())?;
//! let articles = agent.get_daily_news(&DailyNewsRequest::new("technology")).await?;
//! ```

pub mod agent;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod hashtags;
pub mod models;
pub mod outputs;
pub mod sources;
pub mod summarizer;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use agent::{DefaultNewsAgent, NewsAgent};
pub use config::{AgentSettings, Credentials, DailyNewsRequest};
pub use error::{Error, Result, SkipReason};
pub use models::{ArticleContent, DailyNews, HeadlineRecord, NewsArticle};
