//! LLM API interaction with exponential backoff retry logic.
//!
//! # Architecture
//!
//! - [`AskAsync`]: Core trait defining async LLM interaction
//! - [`AwfulAsk`]: Sends prompts through `awful_aj` to an OpenAI-compatible endpoint
//! - [`RetryAsk`]: Decorator that adds retry logic to any `AskAsync` implementation
//!
//! # Retry Strategy
//!
//! - Exponential backoff from a base delay, capped at 30 seconds
//! - Random jitter (0-250ms by default) added to prevent thundering herd

use crate::error::{Error, Result};
use awful_aj::api::ask;
use awful_aj::{config, config::AwfulJadeConfig, config_dir, template::ChatTemplate};
use rand::{rng, Rng};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// System prompt for the summarization chat template.
const TEMPLATE_YAML: &str = r#"
system_prompt: "You are a news writer who turns articles into short spoken-word summaries. You only use facts stated in the article."
messages: []
"#;

/// Trait for async LLM interaction.
///
/// Implementors send text to an LLM and return its response. Decorators such
/// as [`RetryAsk`] implement it too.
pub trait AskAsync {
    /// The type of response returned by the LLM.
    type Response;

    /// Send text to the LLM and receive a response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Summarization`] if the request failed.
    async fn ask(&self, text: &str) -> Result<Self::Response>;
}

/// Wrapper that adds exponential backoff retry logic to any [`AskAsync`] implementation.
///
/// # Backoff Strategy
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..=max_jitter)
/// ```
pub struct RetryAsk<T> {
    /// The underlying LLM client to wrap.
    inner: T,
    /// Maximum number of retry attempts before giving up.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: StdDuration,
    /// Maximum delay cap to prevent excessive waiting.
    max_delay: StdDuration,
    /// Upper bound of the random jitter added to each delay.
    max_jitter: StdDuration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    /// Create a new retry wrapper around an existing [`AskAsync`] implementation.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = AwfulAsk::from_config_file(None, api_key)?;
    /// let retry_client = RetryAsk::new(client, 2, Duration::from_secs(1));
    /// ```
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
            max_jitter: StdDuration::from_millis(250),
        }
    }

    pub fn with_max_jitter(mut self, max_jitter: StdDuration) -> Self {
        self.max_jitter = max_jitter;
        self
    }

    fn backoff(&self, attempt: usize) -> StdDuration {
        let shift = (attempt.saturating_sub(1)).min(16) as u32;
        let delay = self
            .base_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay);
        let jitter_ms = self.max_jitter.as_millis() as u64;
        if jitter_ms == 0 {
            delay
        } else {
            delay + StdDuration::from_millis(rng().random_range(0..=jitter_ms))
        }
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync,
{
    type Response = T::Response;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.ask(text).await {
                Ok(resp) => {
                    return Ok(resp);
                }
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "ask() exhausted retries"
                        );
                        return Err(e);
                    }

                    let delay = self.backoff(attempt);
                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                        elapsed_ms_total = total_dt.as_millis() as u64,
                        ?delay,
                        error = %e,
                        "ask() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// [`AskAsync`] implementation backed by `awful_aj::api::ask`.
///
/// Holds the endpoint configuration and chat template behind `Arc`s so the
/// summarizer can be shared by concurrent article tasks.
#[derive(Clone)]
pub struct AwfulAsk {
    /// LLM configuration (API key, endpoint, model settings).
    config: Arc<AwfulJadeConfig>,
    /// Chat template defining the conversation structure.
    template: Arc<ChatTemplate>,
}

impl fmt::Debug for AwfulAsk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwfulAsk").finish_non_exhaustive()
    }
}

impl AwfulAsk {
    pub fn new(config: AwfulJadeConfig, template: ChatTemplate) -> Self {
        Self {
            config: Arc::new(config),
            template: Arc::new(template),
        }
    }

    /// Load the awful_aj `config.yaml` and override its API key.
    ///
    /// `config_path` defaults to `config.yaml` in awful_aj's config directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the file cannot be located or parsed.
    #[instrument(level = "info", skip_all)]
    pub fn from_config_file(config_path: Option<&str>, api_key: &str) -> Result<Self> {
        let path = match config_path {
            Some(path) => path.to_string(),
            None => config_dir()
                .map_err(|e| Error::Configuration(format!("no awful_aj config directory: {e}")))?
                .join("config.yaml")
                .to_string_lossy()
                .into_owned(),
        };

        let mut conf = config::load_config(&path)
            .map_err(|e| Error::Configuration(format!("failed to load {path}: {e}")))?;
        conf.api_key = api_key.to_string();
        info!(config_path = %path, "Loaded model configuration");

        Ok(Self::new(conf, summary_template()?))
    }
}

/// The chat template used for every summary request.
pub fn summary_template() -> Result<ChatTemplate> {
    serde_yaml::from_str(TEMPLATE_YAML)
        .map_err(|e| Error::Configuration(format!("invalid summary template: {e}")))
}

impl AskAsync for AwfulAsk {
    type Response = String;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response> {
        let t0 = Instant::now();
        let res = ask(&self.config, text.to_string(), &self.template, None, None).await;
        let dt = t0.elapsed();

        res.map_err(|e| {
            warn!(elapsed_ms = dt.as_millis() as u64, error = %e, "API call failed");
            Error::Summarization(e.to_string())
        })
    }
}
