//! Output generation for finished articles.
//!
//! # Submodules
//!
//! - [`console`]: Renders articles as a numbered plain-text list for stdout
//! - [`json`]: Writes a [`crate::models::DailyNews`] edition to disk
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── business_morning.json
//!     ├── business_evening.json
//!     └── technology_afternoon.json
//! ```

pub mod console;
pub mod json;
