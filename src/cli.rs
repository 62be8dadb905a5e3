//! Command-line interface definitions.

use clap::Parser;
use std::path::PathBuf;

use crate::config::DEFAULT_MODEL;

/// PrepZone — AI-driven disaster preparedness training for the terminal.
#[derive(Debug, Parser)]
#[command(name = "prep_zone", version, about)]
pub struct Cli {
    /// Gemini model used for content generation.
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL joined onto relative static image paths. Without it,
    /// relative entries fall back to the placeholder image.
    #[arg(long)]
    pub asset_base: Option<String>,

    /// Log file path. Logs go to a file so they do not fight the TUI for
    /// the terminal.
    #[arg(long, default_value = "prep_zone.log")]
    pub log_file: PathBuf,
}
