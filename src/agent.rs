//! The daily news orchestrator.
//!
//! [`NewsAgent`] wires a [`HeadlineSource`], a [`ContentExtractor`] and a
//! [`Summarizer`] together and keeps pulling headlines until it has the number
//! of finished articles the caller asked for.
//!
//! # Pipeline
//!
//! 1. Fetch `page_size` top headlines for the category
//! 2. Process them in waves (extract, summarize, tag), never starting more
//!    articles than are still missing
//! 3. While short, fetch backfill batches that exclude every URL already
//!    tried, spending at most `max_retries` extra attempts
//! 4. Return the articles in processing order, truncated to `page_size`
//!
//! Per-article failures never escape: each becomes a [`SkipReason`] in the
//! log. Only a failed initial fetch is reported to the caller.

use crate::api::{AwfulAsk, RetryAsk};
use crate::config::{
    AgentSettings, Credentials, DailyNewsRequest, NO_SUMMARY, NO_TITLE, SOURCE_TIMEOUT,
    UNKNOWN_SOURCE,
};
use crate::error::{Error, Result, SkipReason};
use crate::extract::{CachedExtractor, ContentExtractor, HtmlExtractor};
use crate::hashtags::HashtagGenerator;
use crate::models::{ArticleContent, HeadlineRecord, NewsArticle};
use crate::sources::{HeadlineSource, NewsApiSource};
use crate::summarizer::{ModelSummarizer, Summarizer};
use futures::FutureExt;
use futures::stream::{self, StreamExt};
use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

/// Model calls are retried twice, starting one second apart.
const MODEL_RETRIES: usize = 2;
const MODEL_BASE_DELAY: Duration = Duration::from_secs(1);

/// The production pipeline: NewsAPI headlines, cached HTML extraction, and
/// model summaries with retry.
pub type DefaultNewsAgent =
    NewsAgent<NewsApiSource, CachedExtractor<HtmlExtractor>, ModelSummarizer<RetryAsk<AwfulAsk>>>;

/// Produces daily news digests. See the [module docs](self) for the pipeline.
#[derive(Debug)]
pub struct NewsAgent<H, E, S> {
    source: H,
    extractor: E,
    summarizer: S,
    settings: AgentSettings,
}

impl DefaultNewsAgent {
    /// Build the production agent.
    ///
    /// `model_config` is the awful_aj `config.yaml` describing the model
    /// endpoint; `None` uses awful_aj's default location.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if any collaborator cannot be built.
    pub fn from_credentials(
        credentials: &Credentials,
        news_api_base: &str,
        model_config: Option<&str>,
        settings: AgentSettings,
    ) -> Result<Self> {
        let source = NewsApiSource::new(
            credentials.news_api_key.clone(),
            news_api_base,
            SOURCE_TIMEOUT,
        )?;
        let extractor = CachedExtractor::with_default_capacity(HtmlExtractor::with_defaults()?);
        let model = AwfulAsk::from_config_file(model_config, &credentials.model_api_key)?;
        let summarizer = ModelSummarizer::new(RetryAsk::new(model, MODEL_RETRIES, MODEL_BASE_DELAY));

        info!(%news_api_base, "News agent initialized");
        Ok(Self::new(source, extractor, summarizer, settings))
    }
}

/// Bookkeeping for one `get_daily_news` call.
struct Run {
    page_size: usize,
    /// Every URL handed to processing, successful or not.
    processed: HashSet<String>,
    articles: Vec<NewsArticle>,
    skipped: usize,
}

impl Run {
    fn new(page_size: usize) -> Self {
        Self {
            page_size,
            processed: HashSet::new(),
            articles: Vec::with_capacity(page_size),
            skipped: 0,
        }
    }

    fn needed(&self) -> usize {
        self.page_size.saturating_sub(self.articles.len())
    }
}

impl<H, E, S> NewsAgent<H, E, S>
where
    H: HeadlineSource,
    E: ContentExtractor,
    S: Summarizer,
{
    pub fn new(source: H, extractor: E, summarizer: S, settings: AgentSettings) -> Self {
        Self {
            source,
            extractor,
            summarizer,
            settings,
        }
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    /// Fetch up to `page_size` top headlines.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::SourceFetch`] from the source.
    pub async fn get_top_headlines(
        &self,
        category: &str,
        page_size: usize,
        language: &str,
        country: &str,
    ) -> Result<Vec<HeadlineRecord>> {
        self.source
            .fetch_top_headlines(category, page_size, language, country)
            .await
    }

    /// Fetch headlines whose URLs are not in `exclude_urls`. Never fails.
    pub async fn get_additional_headlines(
        &self,
        category: &str,
        exclude_urls: &HashSet<String>,
        page_size: usize,
        language: &str,
        country: &str,
    ) -> Vec<HeadlineRecord> {
        self.source
            .fetch_additional_headlines(category, exclude_urls, page_size, language, country)
            .await
    }

    /// Extract the article at `url`, or `None` if that fails for any reason.
    pub async fn get_article_content(&self, url: &str) -> Option<Arc<ArticleContent>> {
        match self.extract(url).await {
            Ok(content) => Some(content),
            Err(e) => {
                warn!(error = %e, "Could not extract article content");
                None
            }
        }
    }

    /// Summarize text with the configured summarizer.
    pub async fn generate_summary(&self, text: &str) -> String {
        self.summarizer.summarize(text).await
    }

    /// Hashtags for an article.
    ///
    /// When `content` is `None` the article at `url` is extracted first; if
    /// that fails only the category tag is returned.
    pub async fn generate_hashtags(
        &self,
        url: &str,
        category: &str,
        content: Option<&ArticleContent>,
    ) -> Vec<String> {
        match content {
            Some(content) => {
                HashtagGenerator::generate(category, Some(content), self.settings.max_hashtags)
            }
            None => {
                let fetched = self.get_article_content(url).await;
                HashtagGenerator::generate(category, fetched.as_deref(), self.settings.max_hashtags)
            }
        }
    }

    /// Turn one headline into a finished article.
    ///
    /// Never panics and never returns an [`Error`]: every failure, a panic in
    /// a collaborator included, is logged with the headline's title and
    /// returned as a [`SkipReason`].
    pub async fn process_one(
        &self,
        headline: HeadlineRecord,
        category: &str,
        use_model_summary: bool,
    ) -> std::result::Result<NewsArticle, SkipReason> {
        let title = headline
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(NO_TITLE)
            .to_string();

        let outcome = AssertUnwindSafe(self.build_article(&headline, &title, category, use_model_summary))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(SkipReason::Unexpected(panic_message(&*panic))));

        match &outcome {
            Ok(_) => debug!(%title, "Processed article"),
            Err(SkipReason::Unexpected(message)) => {
                error!(%title, error = %message, "Error processing article")
            }
            Err(reason) => warn!(%title, %reason, "Skipping article"),
        }
        outcome
    }

    async fn build_article(
        &self,
        headline: &HeadlineRecord,
        title: &str,
        category: &str,
        use_model_summary: bool,
    ) -> std::result::Result<NewsArticle, SkipReason> {
        let Some(url) = headline.url() else {
            return Err(SkipReason::MissingUrl);
        };

        let (summary, hashtags) = match self.extract(url).await {
            Ok(content) => {
                let summary = if use_model_summary {
                    self.summarizer.summarize(&content.text).await
                } else if content.summary.trim().is_empty() {
                    NO_SUMMARY.to_string()
                } else {
                    content.summary.clone()
                };
                let hashtags =
                    HashtagGenerator::generate(category, Some(&*content), self.settings.max_hashtags);
                (summary, hashtags)
            }
            Err(e) => {
                let Some(description) = headline.description() else {
                    return Err(SkipReason::NoContent {
                        reason: e.to_string(),
                    });
                };
                warn!(%title, error = %e, "Could not parse article content; using description");
                let hashtags = HashtagGenerator::generate(category, None, self.settings.max_hashtags);
                (description.to_string(), hashtags)
            }
        };

        Ok(NewsArticle {
            title: title.to_string(),
            summary,
            source: headline
                .source_name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(UNKNOWN_SOURCE)
                .to_string(),
            published_at: headline.published_at.clone().unwrap_or_default(),
            hashtags,
            url: url.to_string(),
        })
    }

    async fn extract(&self, url: &str) -> Result<Arc<ArticleContent>> {
        let limit = self.settings.extract_timeout;
        timeout(limit, self.extractor.extract(url))
            .await
            .unwrap_or_else(|_| Err(Error::extraction(url, format!("timed out after {limit:?}"))))
    }

    /// Produce up to `request.page_size` finished articles.
    ///
    /// The result never holds more than `page_size` articles, never holds the
    /// same URL twice, and keeps the order in which headlines were fetched.
    /// Fewer articles come back when the source and the retry budget run out.
    ///
    /// # Errors
    ///
    /// Only a failed initial headline fetch is an error.
    #[instrument(level = "info", skip_all, fields(category = %request.category, page_size = request.page_size))]
    pub async fn get_daily_news(&self, request: &DailyNewsRequest) -> Result<Vec<NewsArticle>> {
        let page_size = request.page_size;
        if page_size == 0 {
            warn!("Requested zero articles; nothing to do");
            return Ok(Vec::new());
        }

        let headlines = self
            .get_top_headlines(&request.category, page_size, &request.language, &request.country)
            .await
            .inspect_err(|e| error!(error = %e, "Initial headline fetch failed"))?;

        if headlines.is_empty() {
            warn!("No headlines found for category");
            return Ok(Vec::new());
        }
        info!(count = headlines.len(), "Processing initial articles");

        let mut run = Run::new(page_size);
        self.fill(&mut run, headlines, request, None).await;

        let mut retries_used = 0usize;
        while run.needed() > 0 && retries_used < request.max_retries {
            info!(
                needed = run.needed(),
                retries_left = request.max_retries - retries_used,
                "Fetching additional headlines"
            );
            let batch: Vec<HeadlineRecord> = self
                .get_additional_headlines(
                    &request.category,
                    &run.processed,
                    self.settings.backfill_batch_size,
                    &request.language,
                    &request.country,
                )
                .await
                .into_iter()
                .filter(|h| h.url().is_some_and(|url| !run.processed.contains(url)))
                .collect();

            if batch.is_empty() {
                warn!("No additional headlines available");
                break;
            }
            info!(count = batch.len(), "Backfill batch ready");

            let budget = request.max_retries - retries_used;
            retries_used += self.fill(&mut run, batch, request, Some(budget)).await;
        }

        run.articles.truncate(page_size);
        let final_count = run.articles.len();
        if final_count < page_size {
            warn!(
                final_count,
                requested = page_size,
                skipped = run.skipped,
                retries_used,
                "Only processed {final_count} articles out of {page_size} requested"
            );
        } else {
            info!(final_count, skipped = run.skipped, retries_used, "Daily news ready");
        }
        Ok(run.articles)
    }

    /// Process `candidates` in waves until the run is full, the candidates run
    /// out, or `budget` attempts have been made. Returns the attempts made.
    ///
    /// A wave never holds more headlines than articles are still missing, so
    /// a run cannot overshoot `page_size`. URLs enter `run.processed` before
    /// their wave starts.
    async fn fill(
        &self,
        run: &mut Run,
        candidates: Vec<HeadlineRecord>,
        request: &DailyNewsRequest,
        budget: Option<usize>,
    ) -> usize {
        let mut candidates = candidates.into_iter();
        let mut attempted = 0usize;
        let concurrency = self.settings.max_concurrency.max(1);

        loop {
            let needed = run.needed();
            if needed == 0 {
                break;
            }

            let mut wave = Vec::with_capacity(needed);
            while wave.len() < needed && budget.is_none_or(|b| attempted + wave.len() < b) {
                let Some(headline) = candidates.next() else {
                    break;
                };
                let Some(url) = headline.url() else {
                    warn!(
                        title = headline.title.as_deref().unwrap_or(NO_TITLE),
                        reason = %SkipReason::MissingUrl,
                        "Skipping article"
                    );
                    run.skipped += 1;
                    continue;
                };
                if !run.processed.insert(url.to_string()) {
                    debug!(%url, reason = %SkipReason::AlreadyProcessed, "Skipping article");
                    continue;
                }
                wave.push(headline);
            }

            if wave.is_empty() {
                break;
            }
            attempted += wave.len();
            debug!(size = wave.len(), needed, "Dispatching wave");

            let outcomes: Vec<_> = stream::iter(wave)
                .map(|headline| {
                    self.process_one(headline, &request.category, request.use_model_summary)
                })
                .buffered(concurrency)
                .collect()
                .await;

            for outcome in outcomes {
                match outcome {
                    Ok(article) => run.articles.push(article),
                    Err(_) => run.skipped += 1,
                }
            }
        }

        attempted
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic with a non-string payload".to_string())
}
