//! Shared types for the fleet log scanner.
//!
//! Holds the data model (device records, count entries, fleet statistics,
//! line layout), the error type, CLI settings and small date/format helpers
//! used by the ingestion layer and the binary.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
