//! Data ingestion layer for the fleet log scanner.
//!
//! Responsible for discovering and decoding device log files, identifying
//! each device, filtering lines by date and keyword, aggregating matches per
//! device and rendering the final report.

pub mod aggregator;
pub mod analysis;
pub mod filter;
pub mod identity;
pub mod reader;
pub mod report;

pub use fleetlog_core as core;
