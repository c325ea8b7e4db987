//! Date-cutoff and keyword filtering of device log lines.
//!
//! Lines are parsed by fixed character columns (see [`LineFormat`]): a
//! `"Oct 16"` style date, a time field and the message body. A line matches
//! when its date is on or after the cutoff and it contains any keyword.
//! Matching lines are counted per `(date, message)` with the time of the
//! first occurrence.

use std::path::Path;

use chrono::Datelike;
use fleetlog_core::error::Result;
use fleetlog_core::models::{DateCounts, FilterConfig, LineFormat, LogEntry};
use fleetlog_core::time_utils::parse_month_day;
use tracing::debug;

use crate::reader::{read_text, split_lines, TextDecoder};

// ── Public types ──────────────────────────────────────────────────────────────

/// Result of classifying a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Dated on/after the cutoff and contains a keyword.
    Matched(LogEntry),
    /// Empty date column, too old, or no keyword.
    Skipped,
    /// The date column is not a `"<Mon> <day>"` date.
    Malformed,
}

/// Per-file filter output.
#[derive(Debug, Clone, Default)]
pub struct FileScan {
    pub counts: DateCounts,
    /// `true` once any line matched.
    pub matched: bool,
    pub lines_read: usize,
    pub lines_matched: usize,
    pub lines_malformed: usize,
    /// Decoder that accepted the file, `None` when filtering raw text.
    pub decoder: Option<TextDecoder>,
}

/// Classifies lines against a [`FilterConfig`].
pub struct LineFilter<'a> {
    config: &'a FilterConfig,
    lowered_keywords: Vec<String>,
}

impl<'a> LineFilter<'a> {
    pub fn new(config: &'a FilterConfig) -> Self {
        let lowered_keywords = config.keywords.iter().map(|k| k.to_lowercase()).collect();
        Self {
            config,
            lowered_keywords,
        }
    }

    /// Classify one line.
    pub fn classify(&self, line: &str) -> LineOutcome {
        let format = &self.config.format;

        let date_part = char_slice(line, 0, Some(format.date_width))
            .replace("  ", " ")
            .trim()
            .to_string();
        if date_part.is_empty() {
            return LineOutcome::Skipped;
        }

        let Some(date) = parse_month_day(&date_part, self.config.cutoff.year()) else {
            return LineOutcome::Malformed;
        };
        if date < self.config.cutoff {
            return LineOutcome::Skipped;
        }

        if !self.contains_keyword(line) {
            return LineOutcome::Skipped;
        }

        LineOutcome::Matched(LogEntry {
            date_key: date_part,
            time: char_slice(line, format.time_start, Some(format.time_end))
                .trim()
                .to_string(),
            message: message_body(line, format),
        })
    }

    /// Filter every line of `text`. `\n`, `\r\n` and a lone `\r` all end a
    /// line.
    pub fn filter_text(&self, text: &str) -> FileScan {
        let mut scan = FileScan::default();

        for line in split_lines(text) {
            scan.lines_read += 1;
            match self.classify(line) {
                LineOutcome::Matched(entry) => {
                    scan.matched = true;
                    scan.lines_matched += 1;
                    scan.counts
                        .entry(entry.date_key)
                        .or_default()
                        .entry(entry.message)
                        .or_default()
                        .record(&entry.time);
                }
                LineOutcome::Malformed => scan.lines_malformed += 1,
                LineOutcome::Skipped => {}
            }
        }

        scan
    }

    /// Read, decode and filter the file at `path`.
    ///
    /// Read and decode failures are returned; the caller treats them as an
    /// empty, non-matching file.
    pub fn filter_file(&self, path: &Path) -> Result<FileScan> {
        let decoded = read_text(path)?;
        let mut scan = self.filter_text(&decoded.text);
        scan.decoder = Some(decoded.decoder);

        debug!(
            "File {}: {} lines, {} matched, {} undated ({})",
            path.display(),
            scan.lines_read,
            scan.lines_matched,
            scan.lines_malformed,
            decoded.decoder.name(),
        );

        Ok(scan)
    }

    fn contains_keyword(&self, line: &str) -> bool {
        let lowered = line.to_lowercase();
        self.lowered_keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

/// Filter the file at `path` with `config`.
pub fn filter_file(path: &Path, config: &FilterConfig) -> Result<FileScan> {
    LineFilter::new(config).filter_file(path)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Characters `start..end` of `s` (or `start..` when `end` is `None`),
/// clamped to the string length.
fn char_slice(s: &str, start: usize, end: Option<usize>) -> &str {
    let byte_at = |n: usize| s.char_indices().nth(n).map_or(s.len(), |(i, _)| i);
    let from = byte_at(start);
    let to = end.map_or(s.len(), byte_at);
    if from >= to {
        return "";
    }
    &s[from..to]
}

/// Message column of the whitespace-trimmed line, trimmed again.
fn message_body(line: &str, format: &LineFormat) -> String {
    char_slice(line.trim(), format.message_start, None)
        .trim()
        .to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    const FLASH: &str = "Oct 16 08:00:00.000: %FLASH-LIMITED: limited space available";

    fn config() -> FilterConfig {
        FilterConfig::new(
            NaiveDate::from_ymd_opt(2024, 10, 15).unwrap(),
            vec!["limited space".to_string()],
        )
    }

    // ── classify ──────────────────────────────────────────────────────────────

    #[test]
    fn test_classify_matching_line() {
        let cfg = config();
        let filter = LineFilter::new(&cfg);
        match filter.classify(FLASH) {
            LineOutcome::Matched(entry) => {
                // Fixed columns: time is 7..18 and the body starts at 19.
                assert_eq!(entry.date_key, "Oct 16");
                assert_eq!(entry.time, "08:00:00.00");
                assert_eq!(entry.message, ": %FLASH-LIMITED: limited space available");
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_before_cutoff_skipped() {
        let cfg = config();
        let filter = LineFilter::new(&cfg);
        let line = "Oct 10 08:00:00.000: %FLASH-LIMITED: limited space available";
        assert_eq!(filter.classify(line), LineOutcome::Skipped);
    }

    #[test]
    fn test_classify_cutoff_day_is_inclusive() {
        let cfg = config();
        let filter = LineFilter::new(&cfg);
        let line = "Oct 15 23:59:59.999: limited space";
        assert!(matches!(filter.classify(line), LineOutcome::Matched(_)));
    }

    #[test]
    fn test_classify_keyword_case_insensitive_anywhere() {
        let cfg = config();
        let filter = LineFilter::new(&cfg);
        let line = "Oct 20 01:02:03.004: %SYS-4-FLASH: LIMITED SPACE on flash:";
        assert!(matches!(filter.classify(line), LineOutcome::Matched(_)));
    }

    #[test]
    fn test_classify_without_keyword_skipped() {
        let cfg = config();
        let filter = LineFilter::new(&cfg);
        let line = "Oct 20 01:02:03.004: %LINK-3-UPDOWN: Interface Gi1/0/1, changed state to up";
        assert_eq!(filter.classify(line), LineOutcome::Skipped);
    }

    #[test]
    fn test_classify_empty_date_skipped() {
        let cfg = config();
        let filter = LineFilter::new(&cfg);
        assert_eq!(filter.classify(""), LineOutcome::Skipped);
        assert_eq!(filter.classify("      limited space"), LineOutcome::Skipped);
    }

    #[test]
    fn test_classify_undated_line_malformed() {
        let cfg = config();
        let filter = LineFilter::new(&cfg);
        assert_eq!(
            filter.classify("core-sw01#show flash: limited space"),
            LineOutcome::Malformed
        );
    }

    #[test]
    fn test_classify_glued_day_malformed() {
        let cfg = config();
        let filter = LineFilter::new(&cfg);
        assert_eq!(
            filter.classify("Oct16  08:00:00.00 limited space"),
            LineOutcome::Malformed
        );
    }

    #[test]
    fn test_classify_space_padded_day() {
        let cfg = FilterConfig::new(
            NaiveDate::from_ymd_opt(2024, 11, 1).unwrap(),
            vec!["limited space".to_string()],
        );
        let filter = LineFilter::new(&cfg);
        match filter.classify("Nov  5 08:00:00.00 limited space") {
            LineOutcome::Matched(entry) => {
                assert_eq!(entry.date_key, "Nov 5");
                assert_eq!(entry.time, "08:00:00.00");
                assert_eq!(entry.message, "limited space");
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_custom_line_format() {
        let cfg = config().with_format(LineFormat {
            date_width: 6,
            time_start: 7,
            time_end: 15,
            message_start: 16,
        });
        let filter = LineFilter::new(&cfg);
        match filter.classify("Oct 16 08:00:00 limited space left") {
            LineOutcome::Matched(entry) => {
                assert_eq!(entry.time, "08:00:00");
                assert_eq!(entry.message, "limited space left");
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    // ── filter_text ───────────────────────────────────────────────────────────

    #[test]
    fn test_filter_text_counts_duplicates_and_keeps_first_time() {
        let cfg = config();
        let text = "\
Oct 16 08:00:00.00 %FLASH-LIMITED: limited space available
Oct 16 09:15:00.00 %FLASH-LIMITED: limited space available
";
        let scan = LineFilter::new(&cfg).filter_text(text);
        assert!(scan.matched);
        let entry = &scan.counts["Oct 16"]["%FLASH-LIMITED: limited space available"];
        assert_eq!(entry.count, 2);
        assert_eq!(entry.first_time.as_deref(), Some("08:00:00.00"));
    }

    #[test]
    fn test_filter_text_no_match() {
        let cfg = config();
        let text = "hostname SW1\nOct 16 08:00:00.000: %LINK-3-UPDOWN: up\n";
        let scan = LineFilter::new(&cfg).filter_text(text);
        assert!(!scan.matched);
        assert!(scan.counts.is_empty());
        assert_eq!(scan.lines_read, 2);
        assert_eq!(scan.lines_malformed, 1);
    }

    #[test]
    fn test_filter_text_separates_dates() {
        let cfg = config();
        let text = "\
Oct 16 08:00:00.000: limited space
Oct 17 08:00:00.000: limited space
Oct 10 08:00:00.000: limited space
";
        let scan = LineFilter::new(&cfg).filter_text(text);
        assert_eq!(scan.counts.len(), 2);
        assert_eq!(scan.lines_matched, 2);
        assert!(!scan.counts.contains_key("Oct 10"));
    }

    #[test]
    fn test_filter_text_handles_crlf() {
        let cfg = config();
        let scan = LineFilter::new(&cfg).filter_text("Oct 16 08:00:00.00 limited space\r\n");
        assert!(scan.counts["Oct 16"].contains_key("limited space"));
    }

    #[test]
    fn test_filter_text_handles_lone_cr() {
        let cfg = config();
        let text = "Oct 16 08:00:00.00 limited space A\rOct 17 08:00:00.00 limited space B\r";
        let scan = LineFilter::new(&cfg).filter_text(text);
        assert_eq!(scan.lines_read, 2);
        assert_eq!(scan.lines_matched, 2);
        assert!(scan.counts["Oct 16"].contains_key("limited space A"));
        assert!(scan.counts["Oct 17"].contains_key("limited space B"));
    }

    // ── filter_file ───────────────────────────────────────────────────────────

    #[test]
    fn test_filter_file_cp949() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("10.0.0.1_sw.log");
        let (bytes, _, _) =
            encoding_rs::EUC_KR.encode("Oct 16 08:00:00.00 플래시 limited space\n");
        std::fs::write(&path, &bytes).unwrap();

        let scan = filter_file(&path, &config()).unwrap();
        assert!(scan.matched);
        assert_eq!(scan.decoder, Some(TextDecoder::Cp949));
        assert!(scan.counts["Oct 16"].contains_key("플래시 limited space"));
    }

    #[test]
    fn test_filter_file_undecodable_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("10.0.0.1_sw.log");
        std::fs::write(&path, [0xFF, 0xFF, 0x0A]).unwrap();
        assert!(filter_file(&path, &config()).is_err());
    }

    // ── char_slice ────────────────────────────────────────────────────────────

    #[test]
    fn test_char_slice_clamps() {
        assert_eq!(char_slice("Oct", 0, Some(6)), "Oct");
        assert_eq!(char_slice("Oct", 7, Some(18)), "");
        assert_eq!(char_slice("장애 발생", 1, Some(3)), "애 ");
    }
}
