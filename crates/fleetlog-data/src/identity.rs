//! Device identity extraction from log banners.
//!
//! Device logs captured from a terminal session usually contain the output of
//! `show running-config` (with a `hostname` line) and `show inventory` (with
//! `PID:` lines). The first usable value of each is taken as the device's
//! hostname and model.

use std::path::Path;
use std::sync::OnceLock;

use fleetlog_core::models::DeviceRecord;
use regex::Regex;
use tracing::warn;

use crate::reader::{read_text, split_lines};

fn hostname_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)hostname").expect("regex is valid"))
}

/// Extract `(model, hostname)` from the text of one log file.
///
/// Scanning stops as soon as both are known; later `hostname` or `PID:`
/// lines are ignored. A `hostname` line without a value leaves the hostname
/// unchanged and scanning continues.
pub fn identify(text: &str) -> (Option<String>, Option<String>) {
    let mut model: Option<String> = None;
    let mut hostname: Option<String> = None;
    let mut reading_inventory = false;

    for line in split_lines(text) {
        if model.is_some() && hostname.is_some() {
            break;
        }

        if hostname_pattern().is_match(line) {
            if let Some(token) = line.split_whitespace().nth(1) {
                hostname = Some(token.to_string());
            }
            continue;
        }

        if line.contains("show inventory") {
            reading_inventory = true;
            continue;
        }

        if reading_inventory {
            if let Some(pid) = extract_pid(line) {
                model = Some(pid);
                reading_inventory = false;
            }
        }
    }

    (model, hostname)
}

/// Read `path` and build the [`DeviceRecord`] for `device_id`.
///
/// Unreadable or undecodable files yield a record with neither field set.
pub fn identify_file(path: &Path, device_id: &str) -> DeviceRecord {
    match read_text(path) {
        Ok(decoded) => {
            let (model, hostname) = identify(&decoded.text);
            DeviceRecord {
                device_id: device_id.to_string(),
                model,
                hostname,
            }
        }
        Err(e) => {
            warn!("Could not read device identity: {}", e);
            DeviceRecord::unknown(device_id)
        }
    }
}

/// Value between the first `PID:` and the next `,`, trimmed.
///
/// Values shorter than two characters are treated as absent.
fn extract_pid(line: &str) -> Option<String> {
    let after = line.split("PID:").nth(1)?;
    let value = after.split(',').next()?.trim();
    (value.chars().count() > 1).then(|| value.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
