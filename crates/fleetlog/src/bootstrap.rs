use fleetlog_core::settings::Settings;
use fleetlog_data::analysis::ScanOptions;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a CLI level name (`DEBUG`, `INFO`, `WARNING`, `ERROR`) to a tracing
/// filter directive. Unknown names pass through unchanged.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Log output goes to stderr so the console summary on stdout stays clean.
/// Falls back to `"info"` if the level string is not recognised.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Scan options ───────────────────────────────────────────────────────────────

/// Validate `settings` into the options used by the scan pipeline.
pub fn scan_options(settings: &Settings) -> anyhow::Result<ScanOptions> {
    Ok(ScanOptions {
        extension: settings.extension.clone(),
        exclude_name: settings.output_file_name(),
        filter: settings.filter_config()?,
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
