//! Log file discovery and decoding.
//!
//! Lists candidate device logs in a directory, derives the device identifier
//! from each file name and turns raw bytes into text through an ordered
//! chain of decoders (UTF-8 first, then the legacy Korean codepage).

use std::path::{Path, PathBuf};

use encoding_rs::EUC_KR;
use fleetlog_core::error::{Result, ScanError};
use tracing::{debug, warn};

// ── Decoders ──────────────────────────────────────────────────────────────────

/// A text encoding tried when reading a log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDecoder {
    Utf8,
    /// CP949 / EUC-KR, as written by Korean-locale terminal clients.
    Cp949,
}

/// Decoders tried in order; the first that accepts the whole file wins.
pub const DEFAULT_DECODERS: &[TextDecoder] = &[TextDecoder::Utf8, TextDecoder::Cp949];

impl TextDecoder {
    pub fn name(self) -> &'static str {
        match self {
            TextDecoder::Utf8 => "UTF-8",
            TextDecoder::Cp949 => EUC_KR.name(),
        }
    }

    /// Decode `bytes` strictly. Returns `None` on any malformed sequence.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextDecoder::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            TextDecoder::Cp949 => EUC_KR
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
        }
    }
}

/// File contents together with the decoder that produced them.
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    pub decoder: TextDecoder,
}

/// Run `bytes` through `decoders` in order.
pub fn decode_bytes(bytes: &[u8], decoders: &[TextDecoder]) -> Option<DecodedText> {
    for (attempt, decoder) in decoders.iter().enumerate() {
        if let Some(text) = decoder.decode(bytes) {
            if attempt > 0 {
                debug!("Decoded with fallback encoding {}", decoder.name());
            }
            return Some(DecodedText {
                text,
                decoder: *decoder,
            });
        }
    }
    None
}

/// Read a whole file and decode it with [`DEFAULT_DECODERS`].
///
/// The file handle is released before decoding starts.
pub fn read_text(path: &Path) -> Result<DecodedText> {
    let bytes = std::fs::read(path).map_err(|source| ScanError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    decode_bytes(&bytes, DEFAULT_DECODERS).ok_or_else(|| ScanError::Decode {
        path: path.to_path_buf(),
        tried: DEFAULT_DECODERS
            .iter()
            .map(|d| d.name())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

// ── Lines ─────────────────────────────────────────────────────────────────────

/// Split decoded text into lines ending in `\n`, `\r\n` or a lone `\r`.
///
/// Terminators are not included, and a trailing terminator does not produce
/// a final empty line.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> + '_ {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(|c: char| c == '\r' || c == '\n') {
            Some(end) => {
                let line = &rest[..end];
                let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + terminator..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}

// ── Discovery ─────────────────────────────────────────────────────────────────

/// List regular files directly inside `dir` whose name ends with `extension`,
/// skipping the file named `exclude_name`. Sorted by file name.
pub fn find_log_files(dir: &Path, extension: &str, exclude_name: Option<&str>) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Log directory does not exist: {}", dir.display());
        return Vec::new();
    }

    walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            entry.file_type().is_file()
                && name.ends_with(extension)
                && exclude_name.map_or(true, |excluded| name != excluded)
        })
        .map(|entry| entry.into_path())
        .collect()
}

/// Device identifier for a log file: the file name up to its first `_`.
///
/// `10.20.1.5_core-sw_20241101.log` → `10.20.1.5`. A name without `_` is
/// used whole.
pub fn device_id_from_path(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split_once('_') {
        Some((id, _)) => id.to_string(),
        None => name,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
