//! In-memory collaborators for exercising the pipeline without a network.

use crate::config::API_PAGE_SIZE_LIMIT;
use crate::error::{Error, Result};
use crate::extract::ContentExtractor;
use crate::models::{ArticleContent, HeadlineRecord};
use crate::sources::HeadlineSource;
use crate::summarizer::Summarizer;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A complete headline numbered `i`, with URL `https://news.test/{i}`.
pub(crate) fn headline(i: usize) -> HeadlineRecord {
    HeadlineRecord {
        title: Some(format!("Headline {i}")),
        source_name: Some("Wire".to_string()),
        published_at: Some("2025-05-06T12:00:00Z".to_string()),
        url: Some(format!("https://news.test/{i}")),
        description: Some(format!("Description {i}")),
    }
}

/// Headlines `0..n` without descriptions, so a failed extraction means a skip.
pub(crate) fn bare_headlines(n: usize) -> Vec<HeadlineRecord> {
    (0..n)
        .map(|i| HeadlineRecord {
            description: None,
            ..headline(i)
        })
        .collect()
}

pub(crate) fn url(i: usize) -> String {
    format!("https://news.test/{i}")
}

/// Behaves like a top-headlines API over a fixed, ranked pool: every call
/// returns the first `page_size` records.
pub(crate) struct ScriptedSource {
    pool: Vec<HeadlineRecord>,
    fail: bool,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub(crate) fn new(pool: Vec<HeadlineRecord>) -> Self {
        Self {
            pool,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HeadlineSource for ScriptedSource {
    async fn fetch_top_headlines(
        &self,
        _category: &str,
        page_size: usize,
        _language: &str,
        _country: &str,
    ) -> Result<Vec<HeadlineRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::SourceFetch("apiKeyInvalid: bad key".into()));
        }
        Ok(self
            .pool
            .iter()
            .take(page_size.min(API_PAGE_SIZE_LIMIT))
            .cloned()
            .collect())
    }
}

#[derive(Clone, Copy)]
enum Policy {
    /// Only listed URLs succeed.
    Allow,
    /// Every URL succeeds except the listed ones.
    Deny,
}

/// Extractor with scripted per-URL outcomes that records every call.
pub(crate) struct ScriptedExtractor {
    policy: Policy,
    listed: HashSet<String>,
    panics: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedExtractor {
    fn with_policy(policy: Policy, urls: &[&str]) -> Self {
        Self {
            policy,
            listed: urls.iter().map(|u| u.to_string()).collect(),
            panics: HashSet::new(),
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn succeeding(urls: &[&str]) -> Self {
        Self::with_policy(Policy::Allow, urls)
    }

    pub(crate) fn failing(urls: &[&str]) -> Self {
        Self::with_policy(Policy::Deny, urls)
    }

    pub(crate) fn always() -> Self {
        Self::failing(&[])
    }

    pub(crate) fn panicking_on(mut self, url: &str) -> Self {
        self.panics.insert(url.to_string());
        self
    }

    pub(crate) fn slow_on(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ContentExtractor for ScriptedExtractor {
    async fn extract(&self, url: &str) -> Result<Arc<ArticleContent>> {
        self.calls.lock().unwrap().push(url.to_string());

        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        if self.panics.contains(url) {
            panic!("parser blew up on {url}");
        }

        let listed = self.listed.contains(url);
        let ok = match self.policy {
            Policy::Allow => listed,
            Policy::Deny => !listed,
        };
        if !ok {
            return Err(Error::extraction(url, "HTTP 403 Forbidden"));
        }

        Ok(Arc::new(ArticleContent {
            text: format!("Full text of {url}"),
            keywords: vec!["Economy".to_string(), "GDP".to_string(), "a".to_string()],
            summary: format!("Extractive summary of {url}"),
            url: url.to_string(),
        }))
    }
}

/// Summarizer that echoes its input and records every call.
#[derive(Default)]
pub(crate) struct RecordingSummarizer {
    calls: Mutex<Vec<String>>,
}

impl RecordingSummarizer {
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Summarizer for RecordingSummarizer {
    async fn summarize(&self, text: &str) -> String {
        self.calls.lock().unwrap().push(text.to_string());
        format!("Model summary: {text}")
    }
}
