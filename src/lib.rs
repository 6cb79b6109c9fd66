//! Pull request activity statistics.
//!
//! PR snapshots are merged into a CSV record store, then aggregated over time
//! windows per contributor class (team members vs. external contributors)
//! and rendered as a Markdown report.

pub mod config;
pub mod records;
pub mod report;
pub mod stats;
