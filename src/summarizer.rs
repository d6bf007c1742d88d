//! Model-generated summaries.
//!
//! [`ModelSummarizer`] never fails: empty input and every model error map to
//! fixed sentinel strings, so a bad model call costs one summary, not one
//! article.

use crate::api::AskAsync;
use crate::config::{
    DEFAULT_TEXT_MAX_LENGTH, NO_CONTENT, SHORT_VIDEO_PROMPT_TEMPLATE, SUMMARIZE_TIMEOUT,
    SUMMARY_FAILED,
};
use crate::utils::{truncate_chars, truncate_for_log};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

pub trait Summarizer {
    /// Summarize article text. Always returns something printable.
    async fn summarize(&self, text: &str) -> String;
}

/// Summarizer that prompts a generative model through an [`AskAsync`] client.
#[derive(Debug)]
pub struct ModelSummarizer<A> {
    client: A,
    prompt_template: String,
    max_input_chars: usize,
    timeout: Duration,
}

impl<A> ModelSummarizer<A>
where
    A: AskAsync<Response = String>,
{
    pub fn new(client: A) -> Self {
        Self {
            client,
            prompt_template: SHORT_VIDEO_PROMPT_TEMPLATE.to_string(),
            max_input_chars: DEFAULT_TEXT_MAX_LENGTH,
            timeout: SUMMARIZE_TIMEOUT,
        }
    }

    /// Replace the prompt. `{text}` marks where the article goes.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = template.into();
        self
    }

    pub fn with_max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = max_input_chars;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Summarize `text` with an explicit template and input budget.
    ///
    /// The text is cut to `max_input_chars` characters before it is placed in
    /// the template.
    ///
    /// # Returns
    ///
    /// - `"No content available"` for empty input, without calling the model
    /// - `"Summary generation failed"` on a model error, timeout, or blank reply
    /// - Otherwise the model's reply with surrounding whitespace trimmed
    #[instrument(level = "info", skip_all, fields(chars = text.chars().count(), max_input_chars = max_input_chars))]
    pub async fn summarize_with(&self, text: &str, template: &str, max_input_chars: usize) -> String {
        if text.trim().is_empty() {
            debug!("Empty article text; skipping model call");
            return NO_CONTENT.to_string();
        }

        let prompt = template.replace("{text}", truncate_chars(text, max_input_chars));

        match timeout(self.timeout, self.client.ask(&prompt)).await {
            Ok(Ok(reply)) => {
                let summary = reply.trim();
                if summary.is_empty() {
                    warn!("Model returned an empty summary");
                    return SUMMARY_FAILED.to_string();
                }
                info!(preview = %truncate_for_log(summary, 120), "Generated summary successfully");
                summary.to_string()
            }
            Ok(Err(e)) => {
                error!(error = %e, "Error generating summary");
                SUMMARY_FAILED.to_string()
            }
            Err(_) => {
                error!(timeout = ?self.timeout, "Summary generation timed out");
                SUMMARY_FAILED.to_string()
            }
        }
    }
}

impl<A> Summarizer for ModelSummarizer<A>
where
    A: AskAsync<Response = String>,
{
    async fn summarize(&self, text: &str) -> String {
        self.summarize_with(text, &self.prompt_template, self.max_input_chars)
            .await
    }
}
