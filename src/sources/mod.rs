//! Headline sources.
//!
//! A source lists candidate articles for a category. The orchestrator asks it
//! twice over: once for the initial batch, then for backfill batches that skip
//! URLs it has already tried.
//!
//! | Source | Module | Notes |
//! |--------|--------|-------|
//! | NewsAPI top headlines | [`newsapi`] | Requires an API key; max 100 per page |

pub mod newsapi;

pub use newsapi::NewsApiSource;

use crate::error::Result;
use crate::models::HeadlineRecord;
use std::collections::HashSet;
use tracing::{info, warn};

pub trait HeadlineSource {
    /// Fetch up to `page_size` headlines (capped by the source's page limit).
    ///
    /// # Errors
    ///
    /// Network, authentication, and decoding failures are reported as
    /// [`crate::error::Error::SourceFetch`].
    async fn fetch_top_headlines(
        &self,
        category: &str,
        page_size: usize,
        language: &str,
        country: &str,
    ) -> Result<Vec<HeadlineRecord>>;

    /// Fetch a batch and drop every record whose URL is missing or in `exclude_urls`.
    ///
    /// This is best effort: a failed fetch is logged and yields an empty batch.
    async fn fetch_additional_headlines(
        &self,
        category: &str,
        exclude_urls: &HashSet<String>,
        page_size: usize,
        language: &str,
        country: &str,
    ) -> Vec<HeadlineRecord> {
        match self
            .fetch_top_headlines(category, page_size, language, country)
            .await
        {
            Ok(headlines) => {
                let fresh: Vec<HeadlineRecord> = headlines
                    .into_iter()
                    .filter(|h| h.url().is_some_and(|url| !exclude_urls.contains(url)))
                    .collect();
                info!(
                    count = fresh.len(),
                    %category,
                    "Fetched additional headlines"
                );
                fresh
            }
            Err(e) => {
                warn!(error = %e, %category, "Error fetching additional headlines");
                Vec::new()
            }
        }
    }
}
