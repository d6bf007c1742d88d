//! # Daily News
//!
//! Command-line entry point: fetches the day's headlines for a category,
//! summarizes them, prints the digest, and optionally writes it as JSON.
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... MODEL_API_KEY=... daily_news -c technology -n 5 -j ./json
//! ```

use clap::Parser;
use daily_news::cli::Cli;
use daily_news::outputs::{console, json};
use daily_news::utils::ensure_writable_dir;
use daily_news::{Credentials, DailyNews, DefaultNewsAgent};
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // Values from .env never override the real environment.
    let dotenv = dotenvy::dotenv().ok();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!(dotenv = ?dotenv, "daily_news starting up");

    let args = Cli::parse();
    debug!(category = %args.category, page_size = args.page_size, json_output_dir = ?args.json_output_dir, "Parsed CLI arguments");

    // Early check: fail before any network traffic if the output dir is unusable
    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "JSON output directory is not writable");
            return Err(e.into());
        }
    }

    let credentials = Credentials::resolve(args.news_api_key.clone(), args.model_api_key.clone())
        .inspect_err(|e| error!(error = %e, "Missing credentials"))?;

    let agent = DefaultNewsAgent::from_credentials(
        &credentials,
        &args.news_api_base,
        args.config.as_deref(),
        args.settings(),
    )
    .inspect_err(|e| error!(error = %e, "Failed to initialize news agent"))?;

    let request = args.request();
    let articles = agent
        .get_daily_news(&request)
        .await
        .inspect_err(|e| error!(error = %e, "Failed to build daily news"))?;

    if articles.is_empty() {
        println!("No articles found for category '{}'.", request.category);
    } else {
        print!("{}", console::render(&articles));
    }

    if let Some(dir) = &args.json_output_dir {
        let edition = DailyNews::new(&request.category, articles);
        if let Err(e) = json::write_edition(&edition, dir).await {
            error!(error = %e, "Failed to write JSON edition");
            return Err(e.into());
        }
    }

    info!(elapsed_ms = start_time.elapsed().as_millis() as u64, "daily_news finished");
    Ok(())
}
