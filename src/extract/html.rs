//! Article extraction from arbitrary news pages.
//!
//! Downloads a page with `reqwest`, pulls paragraph text out with `scraper`,
//! then derives keywords and an extractive summary with [`super::nlp`].
//!
//! # Paragraph Selection
//!
//! Selectors are tried from most to least specific (`article p`, `main p`,
//! `p`); the first one that yields any text wins. Very short paragraphs
//! (bylines, "Advertisement", share buttons) are dropped.

use super::{nlp, ContentExtractor};
use crate::config::EXTRACT_TIMEOUT;
use crate::error::{Error, Result};
use crate::models::ArticleContent;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

const USER_AGENT: &str = concat!("daily_news/", env!("CARGO_PKG_VERSION"));
const MIN_PARAGRAPH_CHARS: usize = 20;
const MAX_KEYWORDS: usize = 10;
const SUMMARY_SENTENCES: usize = 5;

static PARAGRAPH_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["article p", "main p", "p"]
        .into_iter()
        .map(|s| Selector::parse(s).expect("paragraph selector is valid"))
        .collect()
});
static OG_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).expect("og:title selector is valid"));
static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title, h1").expect("title selector is valid"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Downloads and parses article pages.
#[derive(Debug, Clone)]
pub struct HtmlExtractor {
    client: Client,
}

impl HtmlExtractor {
    /// Build an extractor whose HTTP requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(EXTRACT_TIMEOUT)
    }

    /// Turn a downloaded page into [`ArticleContent`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContentExtraction`] when no article text can be found.
    pub fn parse(url: &str, html: &str) -> Result<ArticleContent> {
        let document = Html::parse_document(html);

        let title = document
            .select(&OG_TITLE)
            .filter_map(|el| el.value().attr("content"))
            .map(collapse_whitespace)
            .find(|t| !t.is_empty())
            .or_else(|| {
                document
                    .select(&TITLE)
                    .map(|el| collapse_whitespace(&el.text().collect::<String>()))
                    .find(|t| !t.is_empty())
            })
            .unwrap_or_default();

        let text = PARAGRAPH_SELECTORS
            .iter()
            .map(|selector| {
                document
                    .select(selector)
                    .map(|el| collapse_whitespace(&el.text().collect::<Vec<_>>().join(" ")))
                    .filter(|p| p.chars().count() >= MIN_PARAGRAPH_CHARS)
                    .collect::<Vec<_>>()
                    .join("\n\n")
            })
            .find(|text| !text.is_empty())
            .ok_or_else(|| Error::extraction(url, "no article text found"))?;

        let keywords = nlp::keywords(&title, &text, MAX_KEYWORDS);
        let summary = nlp::extractive_summary(&title, &text, &keywords, SUMMARY_SENTENCES);
        debug!(%title, keywords = ?keywords, "Analyzed article text");

        Ok(ArticleContent {
            text,
            keywords,
            summary,
            url: url.to_string(),
        })
    }
}

fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

/// Only markup is worth parsing; PDFs, images and feeds are rejected up front.
fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

impl ContentExtractor for HtmlExtractor {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn extract(&self, url: &str) -> Result<Arc<ArticleContent>> {
        let parsed = Url::parse(url).map_err(|e| Error::extraction(url, format!("invalid URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::extraction(
                url,
                format!("unsupported scheme {}", parsed.scheme()),
            ));
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| Error::extraction(url, e))?
            .error_for_status()
            .map_err(|e| Error::extraction(url, e))?;

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_html(content_type) {
                return Err(Error::extraction(
                    url,
                    format!("unsupported content type {content_type}"),
                ));
            }
        }

        let body = response.text().await.map_err(|e| Error::extraction(url, e))?;
        let content = Self::parse(url, &body)?;
        info!(
            bytes = content.text.len(),
            keywords = content.keywords.len(),
            "Parsed article"
        );
        Ok(Arc::new(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<html>
        <head>
            <title>Ignored title | Example News</title>
            <meta property="og:title" content="Central bank holds interest rates steady">
        </head>
        <body>
            <nav><p>Home | World | Business | Technology</p></nav>
            <article>
                <p>The central bank held interest rates steady on Wednesday, as expected.</p>
                <p>Advertisement</p>
                <p>Policymakers said inflation is cooling but the labor market remains tight.</p>
                <p>Markets had priced in no change to interest rates before the meeting.</p>
            </article>
        </body>
    </html>"#;

    fn html_response(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
    }

    #[test]
    fn test_parse_prefers_article_paragraphs() {
        let content = HtmlExtractor::parse("https://example.com/rates", PAGE).unwrap();
        assert!(content.text.starts_with("The central bank held interest rates"));
        assert!(!content.text.contains("Home | World"));
        assert!(!content.text.contains("Advertisement"));
        assert_eq!(content.text.split("\n\n").count(), 3);
        assert_eq!(content.url, "https://example.com/rates");
    }

    #[test]
    fn test_parse_derives_keywords_and_summary() {
        let content = HtmlExtractor::parse("https://example.com/rates", PAGE).unwrap();
        assert!(content.keywords.len() <= MAX_KEYWORDS);
        assert!(content.keywords.contains(&"rates".to_string()));
        assert!(content.keywords.contains(&"interest".to_string()));
        assert!(content.summary.contains("central bank held interest rates"));
    }

    #[test]
    fn test_parse_falls_back_to_any_paragraph() {
        let html = "<html><body><div><p>A standalone paragraph long enough to keep.</p></div></body></html>";
        let content = HtmlExtractor::parse("https://example.com/x", html).unwrap();
        assert_eq!(content.text, "A standalone paragraph long enough to keep.");
    }

    #[test]
    fn test_parse_without_text_fails() {
        let err = HtmlExtractor::parse("https://example.com/x", "<html><body><img></body></html>")
            .unwrap_err();
        assert!(matches!(err, Error::ContentExtraction { .. }));
    }

    #[test]
    fn test_is_html() {
        assert!(is_html("text/html"));
        assert!(is_html("text/html; charset=UTF-8"));
        assert!(is_html("application/xhtml+xml"));
        assert!(!is_html("application/pdf"));
        assert!(!is_html("image/png"));
    }

    #[tokio::test]
    async fn test_extract_downloads_and_parses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/news/rates"))
            .respond_with(html_response(PAGE))
            .mount(&server)
            .await;

        let extractor = HtmlExtractor::with_defaults().unwrap();
        let url = format!("{}/news/rates", server.uri());
        let content = extractor.extract(&url).await.unwrap();

        assert_eq!(content.url, url);
        assert!(content.text.contains("labor market"));
    }

    #[tokio::test]
    async fn test_extract_fails_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/paywalled"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let extractor = HtmlExtractor::with_defaults().unwrap();
        let err = extractor
            .extract(&format!("{}/paywalled", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ContentExtraction { .. }));
    }

    #[tokio::test]
    async fn test_extract_rejects_binary_content() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/report.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x25, 0x50, 0x44, 0x46], "application/pdf"))
            .mount(&server)
            .await;

        let extractor = HtmlExtractor::with_defaults().unwrap();
        let err = extractor
            .extract(&format!("{}/report.pdf", server.uri()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unsupported content type"));
    }

    #[tokio::test]
    async fn test_extract_rejects_non_http_urls() {
        let extractor = HtmlExtractor::with_defaults().unwrap();
        let err = extractor.extract("ftp://example.com/file").await.unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));

        let err = extractor.extract("not a url").await.unwrap_err();
        assert!(err.to_string().contains("invalid URL"));
    }

    #[tokio::test]
    async fn test_extract_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(html_response(PAGE).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let extractor = HtmlExtractor::new(Duration::from_millis(100)).unwrap();
        let err = extractor.extract(&server.uri()).await.unwrap_err();
        assert!(matches!(err, Error::ContentExtraction { .. }));
    }
}
