//! NewsAPI top-headlines client.
//!
//! Calls `GET {base}/top-headlines` with the category, language, country and
//! page size, authenticating with the `X-Api-Key` header.
//!
//! # Response Shape
//!
//! ```text
//! { "status": "ok", "totalResults": 38,
//!   "articles": [ { "source": { "id": null, "name": "Reuters" },
//!                   "title": "...", "description": "...", "url": "...",
//!                   "publishedAt": "2025-05-06T14:30:00Z" } ] }
//! ```
//!
//! Failures come back as `{ "status": "error", "code": "...", "message": "..." }`,
//! usually with a 4xx status.

use super::HeadlineSource;
use crate::config::{API_PAGE_SIZE_LIMIT, NEWS_API_BASE, SOURCE_TIMEOUT};
use crate::error::{Error, Result};
use crate::models::HeadlineRecord;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopHeadlinesResponse {
    status: String,
    #[serde(default)]
    articles: Vec<ApiArticle>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiArticle {
    source: Option<ApiSource>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiSource {
    name: Option<String>,
}

impl From<ApiArticle> for HeadlineRecord {
    fn from(article: ApiArticle) -> Self {
        HeadlineRecord {
            title: article.title,
            source_name: article.source.and_then(|s| s.name),
            published_at: article.published_at,
            url: article.url,
            description: article.description,
        }
    }
}

/// [`HeadlineSource`] backed by the NewsAPI `top-headlines` endpoint.
#[derive(Clone)]
pub struct NewsApiSource {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl std::fmt::Debug for NewsApiSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsApiSource")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl NewsApiSource {
    /// Build a client for `base_url` (normally [`NEWS_API_BASE`]).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for an empty key, an unparseable base
    /// URL, or an HTTP client that cannot be built.
    pub fn new(api_key: impl Into<String>, base_url: &str, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::Configuration("news API key is empty".into()));
        }

        // A trailing slash keeps `join` from replacing the last path segment.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| Error::Configuration(format!("invalid news API base URL {base_url}: {e}")))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    pub fn with_defaults(api_key: impl Into<String>) -> Result<Self> {
        Self::new(api_key, NEWS_API_BASE, SOURCE_TIMEOUT)
    }
}

impl HeadlineSource for NewsApiSource {
    #[instrument(level = "info", skip_all, fields(%category, page_size = page_size, %language, %country))]
    async fn fetch_top_headlines(
        &self,
        category: &str,
        page_size: usize,
        language: &str,
        country: &str,
    ) -> Result<Vec<HeadlineRecord>> {
        let page_size = page_size.min(API_PAGE_SIZE_LIMIT);
        let mut url = self
            .base_url
            .join("top-headlines")
            .map_err(|e| Error::SourceFetch(format!("failed to build headlines URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("category", category)
            .append_pair("language", language)
            .append_pair("country", country)
            .append_pair("pageSize", &page_size.to_string());
        debug!(%url, "Requesting top headlines");

        let response = self
            .client
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, %category, "Error fetching headlines");
                Error::SourceFetch(e.to_string())
            })?;

        let status = response.status();
        let body: TopHeadlinesResponse = response.json().await.map_err(|e| {
            error!(error = %e, %status, "Undecodable headlines response");
            Error::SourceFetch(format!("HTTP {status}: {e}"))
        })?;

        if !status.is_success() || body.status != "ok" {
            let code = body.code.unwrap_or_else(|| status.to_string());
            let message = body.message.unwrap_or_default();
            error!(%code, %message, %category, "Headline source returned an error");
            return Err(Error::SourceFetch(format!("{code}: {message}")));
        }

        let headlines: Vec<HeadlineRecord> = body.articles.into_iter().map(Into::into).collect();
        info!(count = headlines.len(), %category, "Fetched headlines");
        Ok(headlines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ok_body() -> serde_json::Value {
        serde_json::json!({
            "status": "ok",
            "totalResults": 3,
            "articles": [
                {
                    "source": { "id": "reuters", "name": "Reuters" },
                    "author": "Staff",
                    "title": "Markets rally",
                    "description": "Stocks rose.",
                    "url": "https://example.com/markets",
                    "urlToImage": null,
                    "publishedAt": "2025-05-06T14:30:00Z",
                    "content": "Stocks rose on Tuesday..."
                },
                {
                    "source": { "id": null, "name": null },
                    "title": null,
                    "description": null,
                    "url": "https://example.com/untitled",
                    "publishedAt": null
                },
                {
                    "source": { "id": null, "name": "Wire" },
                    "title": "No link",
                    "url": null
                }
            ]
        })
    }

    fn source_for(server: &MockServer) -> NewsApiSource {
        NewsApiSource::new("test-key", &server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_top_headlines_parses_articles() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .and(header("X-Api-Key", "test-key"))
            .and(query_param("category", "business"))
            .and(query_param("language", "en"))
            .and(query_param("country", "us"))
            .and(query_param("pageSize", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .mount(&server)
            .await;

        let headlines = source_for(&server)
            .fetch_top_headlines("business", 5, "en", "us")
            .await
            .unwrap();

        assert_eq!(headlines.len(), 3);
        assert_eq!(headlines[0].title.as_deref(), Some("Markets rally"));
        assert_eq!(headlines[0].source_name.as_deref(), Some("Reuters"));
        assert_eq!(headlines[0].published_at.as_deref(), Some("2025-05-06T14:30:00Z"));
        assert_eq!(headlines[0].description(), Some("Stocks rose."));
        assert_eq!(headlines[1].title, None);
        assert_eq!(headlines[1].source_name, None);
        assert_eq!(headlines[2].url(), None);
    }

    #[tokio::test]
    async fn test_page_size_is_capped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .and(query_param("pageSize", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(1)
            .mount(&server)
            .await;

        source_for(&server)
            .fetch_top_headlines("business", 500, "en", "us")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_base_url_with_path_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/top-headlines"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(1)
            .mount(&server)
            .await;

        let source =
            NewsApiSource::new("test-key", &format!("{}/v2", server.uri()), Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            source.fetch_top_headlines("science", 5, "en", "us").await.unwrap().len(),
            3
        );
    }

    #[tokio::test]
    async fn test_api_error_is_source_fetch_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "status": "error",
                "code": "apiKeyInvalid",
                "message": "Your API key is invalid or incorrect."
            })))
            .mount(&server)
            .await;

        let err = source_for(&server)
            .fetch_top_headlines("business", 5, "en", "us")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::SourceFetch(ref m) if m.contains("apiKeyInvalid")));
    }

    #[tokio::test]
    async fn test_garbage_body_is_source_fetch_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let err = source_for(&server)
            .fetch_top_headlines("business", 5, "en", "us")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SourceFetch(_)));
    }

    #[tokio::test]
    async fn test_additional_headlines_filter_and_swallow_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .and(query_param("pageSize", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .mount(&server)
            .await;

        let source = source_for(&server);
        let exclude: HashSet<String> = ["https://example.com/markets".to_string()].into();
        let batch = source
            .fetch_additional_headlines("business", &exclude, 20, "en", "us")
            .await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].url(), Some("https://example.com/untitled"));

        // Nothing is mounted for this page size, so the server answers 404.
        let empty = source
            .fetch_additional_headlines("business", &exclude, 7, "en", "us")
            .await;
        assert!(empty.is_empty());
    }

    #[test]
    fn test_empty_key_is_configuration_error() {
        let err = NewsApiSource::with_defaults("  ").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
