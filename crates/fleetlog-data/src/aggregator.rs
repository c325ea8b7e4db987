//! Per-device aggregation of filtered log lines.
//!
//! Each processed file contributes its `(date, message)` counts to the
//! running totals of its device. Fleet membership (every scanned device and
//! every device with at least one match) is tracked alongside.

use std::collections::BTreeMap;

use fleetlog_core::models::{DateCounts, DeviceRecord, FleetStats};

use crate::filter::FileScan;

// ── FleetAggregator ───────────────────────────────────────────────────────────

/// Accumulates file results for one directory run.
///
/// Merges must happen in a fixed order: when several files of one device
/// report the same `(date, message)`, the first merged `first_time` is kept.
#[derive(Debug, Clone, Default)]
pub struct FleetAggregator {
    records: BTreeMap<String, DeviceRecord>,
    logs: BTreeMap<String, DateCounts>,
    stats: FleetStats,
}

impl FleetAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one file's counts for the device described by `record`.
    ///
    /// The device is always counted in the fleet. Counts are only merged,
    /// and the device only marked as failing, when `matched` is set.
    pub fn merge(&mut self, record: DeviceRecord, file_counts: &DateCounts, matched: bool) {
        let device_id = record.device_id.clone();
        self.stats.record_device(&device_id);
        self.records.insert(device_id.clone(), record);

        if !matched {
            return;
        }

        self.stats.record_error_device(&device_id);
        let device_log = self.logs.entry(device_id).or_default();
        for (date_key, messages) in file_counts {
            let date_log = device_log.entry(date_key.clone()).or_default();
            for (message, entry) in messages {
                date_log.entry(message.clone()).or_default().absorb(entry);
            }
        }
    }

    /// Convenience wrapper around [`FleetAggregator::merge`] for a [`FileScan`].
    pub fn merge_scan(&mut self, record: DeviceRecord, scan: &FileScan) {
        self.merge(record, &scan.counts, scan.matched);
    }

    /// `true` when at least one device has a match.
    pub fn has_errors(&self) -> bool {
        !self.stats.error_devices.is_empty()
    }

    pub fn stats(&self) -> &FleetStats {
        &self.stats
    }

    /// Latest identity seen for every scanned device.
    pub fn records(&self) -> &BTreeMap<String, DeviceRecord> {
        &self.records
    }

    /// Aggregated counts keyed by device id.
    pub fn logs(&self) -> &BTreeMap<String, DateCounts> {
        &self.logs
    }

    /// Aggregated counts for one device.
    pub fn device_log(&self, device_id: &str) -> Option<&DateCounts> {
        self.logs.get(device_id)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
