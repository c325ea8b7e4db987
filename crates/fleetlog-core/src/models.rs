use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Placeholder printed when no inventory `PID:` line was found.
pub const UNKNOWN_MODEL: &str = "Unknown Model";
/// Placeholder printed when no `hostname` line was found.
pub const UNKNOWN_HOST: &str = "Unknown Host";

/// Default keyword set used when none is configured.
pub const DEFAULT_KEYWORDS: &[&str] = &["limited space"];

/// Identity of one network device, as recovered from its log banner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Identifier taken from the log file name (text before the first `_`).
    pub device_id: String,
    /// Inventory product identifier, if one was found.
    pub model: Option<String>,
    /// Configured hostname, if one was found.
    pub hostname: Option<String>,
}

impl DeviceRecord {
    /// A record with neither model nor hostname known.
    pub fn unknown(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            model: None,
            hostname: None,
        }
    }

    /// Model string as shown in reports.
    pub fn model_display(&self) -> &str {
        self.model.as_deref().unwrap_or(UNKNOWN_MODEL)
    }

    /// Hostname string as shown in reports.
    pub fn hostname_display(&self) -> &str {
        self.hostname.as_deref().unwrap_or(UNKNOWN_HOST)
    }
}

/// One classified log line. Lives only while a file is being filtered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Month and day as written in the log, e.g. `"Oct 15"`.
    pub date_key: String,
    /// Raw time column, not validated.
    pub time: String,
    /// Message body following the fixed header columns.
    pub message: String,
}

/// First-seen time and occurrence count for one aggregation key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountEntry {
    /// Time column of the first matching line; set once, never replaced.
    pub first_time: Option<String>,
    pub count: u64,
}

impl CountEntry {
    /// Record one matching line seen at `time`.
    pub fn record(&mut self, time: &str) {
        if self.first_time.is_none() {
            self.first_time = Some(time.to_string());
        }
        self.count += 1;
    }

    /// Fold another entry for the same key into this one.
    ///
    /// The existing `first_time` wins; counts are summed.
    pub fn absorb(&mut self, other: &CountEntry) {
        if self.first_time.is_none() {
            self.first_time = other.first_time.clone();
        }
        self.count += other.count;
    }
}

/// `date_key → message → CountEntry` for one file or one device.
pub type DateCounts = BTreeMap<String, BTreeMap<String, CountEntry>>;

/// Fleet-wide membership sets read once when the report is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetStats {
    pub all_devices: BTreeSet<String>,
    pub error_devices: BTreeSet<String>,
}

impl FleetStats {
    /// Register a scanned device.
    pub fn record_device(&mut self, device_id: &str) {
        self.all_devices.insert(device_id.to_string());
    }

    /// Register a device with at least one matching line.
    ///
    /// Also records it as scanned so `error_devices ⊆ all_devices` holds.
    pub fn record_error_device(&mut self, device_id: &str) {
        self.record_device(device_id);
        self.error_devices.insert(device_id.to_string());
    }

    pub fn total_devices(&self) -> usize {
        self.all_devices.len()
    }

    pub fn error_device_count(&self) -> usize {
        self.error_devices.len()
    }

    /// Percentage of scanned devices with errors; `0.0` for an empty fleet.
    pub fn error_rate(&self) -> f64 {
        if self.all_devices.is_empty() {
            return 0.0;
        }
        self.error_devices.len() as f64 / self.all_devices.len() as f64 * 100.0
    }
}

/// Fixed-column layout of a device log line.
///
/// Defaults describe the syslog header `"Oct 16 08:00:00.000: ..."`:
/// date in columns `0..6`, time in `7..18`, message from `19`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineFormat {
    pub date_width: usize,
    pub time_start: usize,
    pub time_end: usize,
    pub message_start: usize,
}

impl Default for LineFormat {
    fn default() -> Self {
        Self {
            date_width: 6,
            time_start: 7,
            time_end: 18,
            message_start: 19,
        }
    }
}

impl LineFormat {
    /// Check that the column ranges are ordered and non-empty.
    pub fn validate(&self) -> Result<(), String> {
        if self.date_width == 0 {
            return Err("date width must be at least 1".to_string());
        }
        if self.time_start >= self.time_end {
            return Err(format!(
                "time columns {}..{} are empty",
                self.time_start, self.time_end
            ));
        }
        if self.message_start < self.time_end {
            return Err(format!(
                "message column {} overlaps time columns {}..{}",
                self.message_start, self.time_start, self.time_end
            ));
        }
        Ok(())
    }
}

/// Everything the line filter needs to classify a file.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Earliest eligible date; its year is assumed for every log line.
    pub cutoff: NaiveDate,
    /// Keywords matched case-insensitively anywhere in the line.
    pub keywords: Vec<String>,
    pub format: LineFormat,
}

impl FilterConfig {
    pub fn new(cutoff: NaiveDate, keywords: Vec<String>) -> Self {
        Self {
            cutoff,
            keywords,
            format: LineFormat::default(),
        }
    }

    /// Builder-style override of the column layout.
    pub fn with_format(mut self, format: LineFormat) -> Self {
        self.format = format;
        self
    }
}
