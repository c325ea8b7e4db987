//! Text and JSON rendering of aggregated results.
//!
//! The text report lists every failing device (sorted by id), its dates
//! (sorted by day of month) and messages (sorted alphabetically), followed
//! by a fleet statistics block.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use fleetlog_core::error::{Result, ScanError};
use fleetlog_core::formatting::{format_device_count, format_occurrences, format_percent};
use fleetlog_core::models::{CountEntry, DateCounts, DeviceRecord, FleetStats};
use fleetlog_core::time_utils::day_of_date_key;
use serde::Serialize;

use crate::aggregator::FleetAggregator;

/// Printed by the console summary when no device matched.
pub const NO_ERRORS_MESSAGE: &str = "에러/장애 관련 로그가 없습니다.";

// ── Ordering ──────────────────────────────────────────────────────────────────

/// Dates of one device ordered by numeric day, so `"Oct 2"` precedes
/// `"Oct 15"`.
///
/// Keys with the same day are ordered alphabetically by the whole key, not by
/// when they were first seen, so `"Nov 5"` precedes `"Oct 5"` even when the
/// October lines came first in the log.
pub fn dates_by_day(log: &DateCounts) -> Vec<(&String, &BTreeMap<String, CountEntry>)> {
    let mut dates: Vec<_> = log.iter().collect();
    dates.sort_by_key(|(key, _)| day_of_date_key(key).unwrap_or(0));
    dates
}

// ── Text report ───────────────────────────────────────────────────────────────

/// Render the report for the devices in `logs`.
///
/// Devices with no entries are left out. A device missing from `records` is
/// shown with the unknown model/host placeholders.
pub fn render(
    records: &BTreeMap<String, DeviceRecord>,
    logs: &BTreeMap<String, DateCounts>,
    stats: &FleetStats,
) -> String {
    let mut out = String::new();

    for (device_id, log) in logs {
        if log.is_empty() {
            continue;
        }

        let fallback;
        let record = match records.get(device_id) {
            Some(r) => r,
            None => {
                fallback = DeviceRecord::unknown(device_id.as_str());
                &fallback
            }
        };

        let _ = writeln!(
            out,
            "{}, {}, {}:",
            device_id,
            record.model_display(),
            record.hostname_display()
        );

        for (date_key, messages) in dates_by_day(log) {
            for (message, entry) in messages {
                let _ = writeln!(
                    out,
                    "  === {} === {} {} {}",
                    date_key,
                    entry.first_time.as_deref().unwrap_or(""),
                    message,
                    format_occurrences(entry.count)
                );
            }
        }
        out.push('\n');
    }

    out.push_str("\n=== 통계 정보 ===\n");
    out.push_str(&render_stat_lines(
        stats.total_devices(),
        stats.error_device_count(),
        stats.error_rate(),
    ));
    out
}

/// Render the full report held by `aggregator`.
pub fn render_report(aggregator: &FleetAggregator) -> String {
    render(aggregator.records(), aggregator.logs(), aggregator.stats())
}

/// Console summary printed after every run.
///
/// When nothing matched the error count and rate are reported as zero.
pub fn render_console_summary(stats: &FleetStats, any_errors: bool) -> String {
    let mut out = String::new();
    let (errors, rate) = if any_errors {
        (stats.error_device_count(), stats.error_rate())
    } else {
        out.push_str(NO_ERRORS_MESSAGE);
        out.push('\n');
        (0, 0.0)
    };
    out.push_str("\n통계 정보:\n");
    out.push_str(&render_stat_lines(stats.total_devices(), errors, rate));
    out
}

fn render_stat_lines(total: usize, errors: usize, rate: f64) -> String {
    format!(
        "전체 장비 수: {}\n장애 발생 장비 수: {}\n장애 발생률: {}\n",
        format_device_count(total),
        format_device_count(errors),
        format_percent(rate)
    )
}

/// Write `contents` to `path`, replacing any previous file.
///
/// Writes to a temporary sibling first and renames it into place.
pub fn write_report(path: &Path, contents: &str) -> Result<()> {
    let to_write_err = |source: std::io::Error| ScanError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_write_err)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp_name);

    std::fs::write(&tmp, contents).map_err(to_write_err)?;
    std::fs::rename(&tmp, path).map_err(to_write_err)?;
    Ok(())
}

// ── JSON export ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub devices: Vec<JsonDevice>,
    pub statistics: JsonStatistics,
}

#[derive(Debug, Serialize)]
pub struct JsonDevice {
    pub device_id: String,
    pub model: String,
    pub hostname: String,
    pub entries: Vec<JsonEntry>,
}

#[derive(Debug, Serialize)]
pub struct JsonEntry {
    pub date: String,
    pub first_time: Option<String>,
    pub message: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct JsonStatistics {
    pub total_devices: usize,
    pub error_devices: usize,
    pub error_rate: f64,
}

impl JsonReport {
    /// Build the JSON view in the same order as the text report.
    pub fn from_aggregator(aggregator: &FleetAggregator) -> Self {
        let devices = aggregator
            .logs()
            .iter()
            .filter(|(_, log)| !log.is_empty())
            .map(|(device_id, log)| {
                let record = aggregator
                    .records()
                    .get(device_id)
                    .cloned()
                    .unwrap_or_else(|| DeviceRecord::unknown(device_id.as_str()));
                let entries = dates_by_day(log)
                    .into_iter()
                    .flat_map(|(date, messages)| {
                        messages.iter().map(move |(message, entry)| JsonEntry {
                            date: date.clone(),
                            first_time: entry.first_time.clone(),
                            message: message.clone(),
                            count: entry.count,
                        })
                    })
                    .collect();
                JsonDevice {
                    device_id: device_id.clone(),
                    model: record.model_display().to_string(),
                    hostname: record.hostname_display().to_string(),
                    entries,
                }
            })
            .collect();

        let stats = aggregator.stats();
        Self {
            devices,
            statistics: JsonStatistics {
                total_devices: stats.total_devices(),
                error_devices: stats.error_device_count(),
                error_rate: stats.error_rate(),
            },
        }
    }
}

/// Pretty-printed JSON export of `aggregator`.
pub fn to_json(aggregator: &FleetAggregator) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonReport::from_aggregator(
        aggregator,
    ))?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(time: &str, count: u64) -> CountEntry {
        CountEntry {
            first_time: Some(time.to_string()),
            count,
        }
    }

    fn sample() -> FleetAggregator {
        let mut agg = FleetAggregator::new();

        let mut sw2 = DateCounts::new();
        sw2.entry("Oct 15".to_string())
            .or_default()
            .insert("flash: limited space".to_string(), entry("10:00:00.00", 1));
        sw2.entry("Oct 2".to_string())
            .or_default()
            .insert("b limited space".to_string(), entry("11:00:00.00", 2));
        sw2.entry("Oct 2".to_string())
            .or_default()
            .insert("a limited space".to_string(), entry("12:00:00.00", 3));

        let mut sw1 = DateCounts::new();
        sw1.entry("Oct 20".to_string())
            .or_default()
            .insert("limited space".to_string(), entry("01:00:00.00", 1));

        agg.merge(
            DeviceRecord {
                device_id: "10.0.0.2".to_string(),
                model: Some("WS-C3750X-24".to_string()),
                hostname: Some("SW2".to_string()),
            },
            &sw2,
            true,
        );
        agg.merge(DeviceRecord::unknown("10.0.0.1"), &sw1, true);
        agg.merge(DeviceRecord::unknown("10.0.0.3"), &DateCounts::new(), false);
        agg
    }

    #[test]
    fn test_render_full_report() {
        let text = render_report(&sample());
        let expected = "\
10.0.0.1, Unknown Model, Unknown Host:
  === Oct 20 === 01:00:00.00 limited space (발생횟수: 1회)

10.0.0.2, WS-C3750X-24, SW2:
  === Oct 2 === 12:00:00.00 a limited space (발생횟수: 3회)
  === Oct 2 === 11:00:00.00 b limited space (발생횟수: 2회)
  === Oct 15 === 10:00:00.00 flash: limited space (발생횟수: 1회)


=== 통계 정보 ===
전체 장비 수: 3대
장애 발생 장비 수: 2대
장애 발생률: 66.7%
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_dates_by_day_is_numeric() {
        let agg = sample();
        let log = agg.device_log("10.0.0.2").unwrap();
        let keys: Vec<&str> = dates_by_day(log).iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["Oct 2", "Oct 15"]);
    }

    #[test]
    fn test_dates_by_day_equal_days_are_alphabetical() {
        let mut log = DateCounts::new();
        for key in ["Oct 5", "Nov 5", "Oct 1"] {
            log.entry(key.to_string())
                .or_default()
                .insert("limited space".to_string(), entry("08:00:00.00", 1));
        }
        let keys: Vec<&str> = dates_by_day(&log).iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["Oct 1", "Nov 5", "Oct 5"]);
    }

    #[test]
    fn test_render_empty_fleet_rate() {
        let text = render(&BTreeMap::new(), &BTreeMap::new(), &FleetStats::default());
        assert!(text.contains("전체 장비 수: 0대"));
        assert!(text.contains("장애 발생률: 0.0%"));
    }

    #[test]
    fn test_render_device_without_record_uses_placeholders() {
        let mut logs = BTreeMap::new();
        let mut log = DateCounts::new();
        log.entry("Oct 16".to_string())
            .or_default()
            .insert("limited space".to_string(), entry("08:00:00.00", 1));
        logs.insert("sw9".to_string(), log);

        let text = render(&BTreeMap::new(), &logs, &FleetStats::default());
        assert!(text.starts_with("sw9, Unknown Model, Unknown Host:\n"));
    }

    #[test]
    fn test_console_summary_with_errors() {
        let agg = sample();
        let text = render_console_summary(agg.stats(), true);
        assert!(!text.contains(NO_ERRORS_MESSAGE));
        assert!(text.contains("장애 발생 장비 수: 2대"));
        assert!(text.contains("장애 발생률: 66.7%"));
    }

    #[test]
    fn test_console_summary_without_errors() {
        let mut stats = FleetStats::default();
        stats.record_device("a");
        stats.record_device("b");
        let text = render_console_summary(&stats, false);
        assert!(text.starts_with(NO_ERRORS_MESSAGE));
        assert!(text.contains("전체 장비 수: 2대"));
        assert!(text.contains("장애 발생 장비 수: 0대"));
        assert!(text.contains("장애 발생률: 0.0%"));
    }

    #[test]
    fn test_write_report_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("L2_error.txt");
        write_report(&path, "first run with a long body\n").unwrap();
        write_report(&path, "second\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");
    }

    #[test]
    fn test_to_json_structure() {
        let json: serde_json::Value = serde_json::from_str(&to_json(&sample()).unwrap()).unwrap();
        assert_eq!(json["statistics"]["total_devices"], 3);
        assert_eq!(json["statistics"]["error_devices"], 2);
        assert_eq!(json["devices"][0]["device_id"], "10.0.0.1");
        assert_eq!(json["devices"][1]["model"], "WS-C3750X-24");
        assert_eq!(json["devices"][1]["entries"][0]["date"], "Oct 2");
        assert_eq!(json["devices"][1]["entries"][0]["count"], 3);
    }
}
