mod bootstrap;

use anyhow::Result;
use fleetlog_core::settings::Settings;
use fleetlog_data::analysis::process_directory;
use fleetlog_data::report::{render_console_summary, render_report, to_json, write_report};

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("fleetlog v{} starting", env!("CARGO_PKG_VERSION"));

    let options = bootstrap::scan_options(&settings)?;
    let directory = settings.ensure_directory()?;

    tracing::info!(
        "Scanning {} (cutoff {}, keywords {:?})",
        directory.display(),
        options.filter.cutoff,
        options.filter.keywords
    );

    let result = process_directory(directory, &options)?;
    let aggregator = &result.aggregator;

    if aggregator.has_errors() {
        write_report(&settings.output_file, &render_report(aggregator))?;
        println!(
            "\n결과가 {}에 저장되었습니다.",
            settings.output_file.display()
        );
    }

    if let Some(json_path) = &settings.json {
        write_report(json_path, &to_json(aggregator)?)?;
        tracing::info!("JSON written to {}", json_path.display());
    }

    println!(
        "{}",
        render_console_summary(aggregator.stats(), aggregator.has_errors())
    );

    Ok(())
}
