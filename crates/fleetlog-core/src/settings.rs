use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, ScanError};
use crate::models::{FilterConfig, LineFormat, DEFAULT_KEYWORDS};
use crate::time_utils;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Scan network device logs for failure keywords and summarise them per device
#[derive(Parser, Debug, Clone)]
#[command(
    name = "fleetlog",
    about = "Scan network device logs for failure keywords and summarise them per device",
    version
)]
pub struct Settings {
    /// Directory containing one or more `<device>_*.log` files
    pub directory_path: PathBuf,

    /// Report file written when any device matched
    #[arg(long, default_value = "filtered_errors.log")]
    pub output_file: PathBuf,

    /// File name suffix of candidate log files
    #[arg(long, default_value = ".log")]
    pub extension: String,

    /// Keywords matched case-insensitively anywhere in a line
    #[arg(long = "keyword", value_delimiter = ',', default_value = DEFAULT_KEYWORDS[0])]
    pub keywords: Vec<String>,

    /// Month abbreviation of the cutoff date
    #[arg(long, default_value = "Oct")]
    pub start_month: String,

    /// Day of month of the cutoff date (1-31)
    #[arg(long, default_value = "15", value_parser = clap::value_parser!(u32).range(1..=31))]
    pub start_day: u32,

    /// Year assumed for the cutoff and for every log line (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,

    /// Width of the leading date column
    #[arg(long, default_value_t = LineFormat::default().date_width)]
    pub date_width: usize,

    /// First character of the time column
    #[arg(long, default_value_t = LineFormat::default().time_start)]
    pub time_start: usize,

    /// End (exclusive) of the time column
    #[arg(long, default_value_t = LineFormat::default().time_end)]
    pub time_end: usize,

    /// First character of the message body
    #[arg(long, default_value_t = LineFormat::default().message_start)]
    pub message_start: usize,

    /// Also write the aggregated results as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Fail unless `directory_path` names an existing directory.
    pub fn ensure_directory(&self) -> Result<&Path> {
        if !self.directory_path.is_dir() {
            return Err(ScanError::DirectoryNotFound(self.directory_path.clone()));
        }
        Ok(&self.directory_path)
    }

    /// Column layout from the `--date-width`/`--time-*`/`--message-start` flags.
    pub fn line_format(&self) -> LineFormat {
        LineFormat {
            date_width: self.date_width,
            time_start: self.time_start,
            time_end: self.time_end,
            message_start: self.message_start,
        }
    }

    /// Keywords with surrounding whitespace removed and blanks dropped.
    pub fn normalized_keywords(&self) -> Vec<String> {
        self.keywords
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect()
    }

    /// Year assumed for every log line.
    pub fn effective_year(&self) -> i32 {
        self.year.unwrap_or_else(time_utils::current_year)
    }

    /// Validate the cutoff, keywords and line format into a [`FilterConfig`].
    pub fn filter_config(&self) -> Result<FilterConfig> {
        let year = self.effective_year();
        let cutoff = time_utils::cutoff_date(&self.start_month, self.start_day, year)
            .ok_or_else(|| {
                ScanError::Config(format!(
                    "invalid cutoff date: {} {} {}",
                    self.start_month, self.start_day, year
                ))
            })?;

        let keywords = self.normalized_keywords();
        if keywords.is_empty() {
            return Err(ScanError::Config("at least one keyword is required".to_string()));
        }

        let format = self.line_format();
        format.validate().map_err(ScanError::Config)?;

        debug!(
            "Cutoff {}, keywords {:?}, columns {:?}",
            cutoff, keywords, format
        );

        Ok(FilterConfig::new(cutoff, keywords).with_format(format))
    }

    /// File name that must never be scanned as input.
    pub fn output_file_name(&self) -> Option<String> {
        self.output_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
