//! Command-line interface definitions for Daily News.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! API keys and endpoints can also come from environment variables (or a
//! `.env` file, loaded before parsing).

use crate::config::{
    AgentSettings, DEFAULT_CATEGORY, DEFAULT_CONCURRENCY, DEFAULT_COUNTRY, DEFAULT_LANGUAGE,
    DEFAULT_MAX_HASHTAGS, DEFAULT_MAX_RETRIES, DEFAULT_PAGE_SIZE, DailyNewsRequest, NEWS_API_BASE,
};
use clap::Parser;

/// Command-line arguments for the Daily News application.
///
/// # Examples
///
/// ```sh
/// # Five business stories with model summaries
/// daily_news
///
/// # Eight technology stories, extractive summaries, saved as JSON
/// daily_news -c technology -n 8 --extractive -j ./json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// News category (business, technology, science, health, ...)
    #[arg(short, long, default_value = DEFAULT_CATEGORY)]
    pub category: String,

    /// Number of articles to produce
    #[arg(short = 'n', long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Extra headlines to try when articles fail
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: usize,

    /// Use the extractive summary instead of calling the model
    #[arg(long)]
    pub extractive: bool,

    /// Two-letter language code for headlines
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Two-letter country code for headlines
    #[arg(long, default_value = DEFAULT_COUNTRY)]
    pub country: String,

    /// Maximum hashtags per article, category tag included
    #[arg(long, default_value_t = DEFAULT_MAX_HASHTAGS)]
    pub max_hashtags: usize,

    /// Articles processed at once
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Optional output directory for the JSON edition
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Optional path to the model's config.yaml
    #[arg(long, env = "AWFUL_AJ_CONFIG")]
    pub config: Option<String>,

    /// Headline API key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: Option<String>,

    /// Generative model API key
    #[arg(long, env = "MODEL_API_KEY", hide_env_values = true)]
    pub model_api_key: Option<String>,

    /// Base URL of the headline API
    #[arg(long, env = "NEWS_API_BASE", default_value = NEWS_API_BASE)]
    pub news_api_base: String,
}

impl Cli {
    /// The `get_daily_news` request these arguments describe.
    pub fn request(&self) -> DailyNewsRequest {
        DailyNewsRequest::new(self.category.trim().to_lowercase())
            .page_size(self.page_size)
            .max_retries(self.max_retries)
            .use_model_summary(!self.extractive)
            .region(&self.language, &self.country)
    }

    pub fn settings(&self) -> AgentSettings {
        AgentSettings {
            max_hashtags: self.max_hashtags,
            max_concurrency: self.concurrency,
            ..AgentSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["daily_news"]);

        assert_eq!(cli.request(), DailyNewsRequest::default());
        assert_eq!(cli.json_output_dir, None);
        assert_eq!(cli.settings().max_hashtags, 5);
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "daily_news",
            "--category",
            "Technology",
            "--page-size",
            "8",
            "--max-retries",
            "3",
            "--extractive",
            "--json-output-dir",
            "./json",
            "--concurrency",
            "2",
        ]);

        let request = cli.request();
        assert_eq!(request.category, "technology");
        assert_eq!(request.page_size, 8);
        assert_eq!(request.max_retries, 3);
        assert!(!request.use_model_summary);
        assert_eq!(cli.json_output_dir.as_deref(), Some("./json"));
        assert_eq!(cli.settings().max_concurrency, 2);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["daily_news", "-c", "science", "-n", "3", "-j", "/tmp/json"]);

        assert_eq!(cli.category, "science");
        assert_eq!(cli.page_size, 3);
        assert_eq!(cli.json_output_dir.as_deref(), Some("/tmp/json"));
    }

    #[test]
    fn test_cli_explicit_keys() {
        let cli = Cli::parse_from([
            "daily_news",
            "--news-api-key",
            "news-key",
            "--model-api-key",
            "model-key",
            "--news-api-base",
            "http://localhost:9000/v2",
        ]);

        assert_eq!(cli.news_api_key.as_deref(), Some("news-key"));
        assert_eq!(cli.model_api_key.as_deref(), Some("model-key"));
        assert_eq!(cli.news_api_base, "http://localhost:9000/v2");
    }
}
