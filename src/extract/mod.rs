//! Article content extraction.
//!
//! # Submodules
//!
//! - [`html`]: [`HtmlExtractor`], downloads a page and pulls out article text
//! - [`nlp`]: Keyword ranking and extractive summaries
//! - [`cache`]: The bounded [`LruCache`] behind [`CachedExtractor`]
//!
//! Extractors implement [`ContentExtractor`]. [`CachedExtractor`] decorates any
//! extractor with a per-URL LRU cache so repeated lookups skip the download.

pub mod cache;
pub mod html;
pub mod nlp;

pub use cache::LruCache;
pub use html::HtmlExtractor;

use crate::config::CACHE_SIZE;
use crate::error::Result;
use crate::models::ArticleContent;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, instrument};

/// Fetches and parses the article behind a URL.
pub trait ContentExtractor {
    /// Extract text, keywords, and an extractive summary from `url`.
    ///
    /// # Errors
    ///
    /// Any download or parse problem is reported as
    /// [`crate::error::Error::ContentExtraction`].
    async fn extract(&self, url: &str) -> Result<Arc<ArticleContent>>;
}

/// Decorator that caches successful extractions by URL.
///
/// Failures are never cached, so a flaky page gets another chance on the next
/// call. The cache is shared behind a `Mutex` and is never held across an
/// `.await`.
pub struct CachedExtractor<E> {
    inner: E,
    cache: Mutex<LruCache<String, Arc<ArticleContent>>>,
}

impl<E> CachedExtractor<E> {
    pub fn new(inner: E, capacity: usize) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn with_default_capacity(inner: E) -> Self {
        Self::new(inner, CACHE_SIZE)
    }

    /// Number of cached URLs.
    pub fn cached(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Arc<ArticleContent>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E> std::fmt::Debug for CachedExtractor<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cache = self.lock();
        f.debug_struct("CachedExtractor")
            .field("capacity", &cache.capacity())
            .field("cached", &cache.len())
            .finish()
    }
}

impl<E> ContentExtractor for CachedExtractor<E>
where
    E: ContentExtractor,
{
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn extract(&self, url: &str) -> Result<Arc<ArticleContent>> {
        let hit = self.lock().get(url);
        if let Some(content) = hit {
            debug!("Content cache hit");
            return Ok(content);
        }

        let content = self.inner.extract(url).await?;
        if let Some((evicted, _)) = self.lock().insert(url.to_string(), Arc::clone(&content)) {
            debug!(%evicted, "Evicted least recently used article");
        }
        Ok(content)
    }
}
