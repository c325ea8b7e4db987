/// Format a percentage with one decimal place and a `%` suffix.
///
/// # Examples
///
/// ```
/// use fleetlog_core::formatting::format_percent;
///
/// assert_eq!(format_percent(0.0), "0.0%");
/// assert_eq!(format_percent(33.333), "33.3%");
/// assert_eq!(format_percent(100.0), "100.0%");
/// ```
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return "0.0%".to_string();
    }
    format!("{:.1}%", value)
}

/// Format a device count with the `대` counter used in the report.
///
/// # Examples
///
/// ```
/// use fleetlog_core::formatting::format_device_count;
///
/// assert_eq!(format_device_count(12), "12대");
/// ```
pub fn format_device_count(count: usize) -> String {
    format!("{}대", count)
}

/// Format an occurrence count as the report's parenthesised suffix.
///
/// # Examples
///
/// ```
/// use fleetlog_core::formatting::format_occurrences;
///
/// assert_eq!(format_occurrences(3), "(발생횟수: 3회)");
/// ```
pub fn format_occurrences(count: u64) -> String {
    format!("(발생횟수: {}회)", count)
}
