//! JSON output of a daily news edition.
//!
//! Files are grouped by date, one file per category and edition:
//! `{json_output_dir}/{local_date}/{category}_{time_of_day}.json`. Running the
//! same edition twice overwrites the earlier file.

use crate::error::Result;
use crate::models::DailyNews;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Where [`write_edition`] puts `edition` under `json_output_dir`.
pub fn edition_path(edition: &DailyNews, json_output_dir: &str) -> PathBuf {
    Path::new(json_output_dir)
        .join(&edition.local_date)
        .join(format!("{}_{}.json", edition.category, edition.time_of_day))
}

/// Serialize `edition` as pretty JSON and write it, creating directories as needed.
///
/// # Returns
///
/// The path of the written file.
///
/// # Errors
///
/// Returns [`crate::error::Error::Io`] if the directory or file cannot be
/// written, or [`crate::error::Error::Serialization`] if encoding fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_edition(edition: &DailyNews, json_output_dir: &str) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(edition)?;
    let path = edition_path(edition, json_output_dir);

    if let Some(dir) = path.parent() {
        info!(dir = %dir.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), articles = edition.articles.len(), "Wrote JSON edition");
    Ok(path)
}
