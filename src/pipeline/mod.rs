//! Feature engineering and daily difficulty scoring.
//!
//! The pipeline is two whole-table passes: the feature builder derives
//! per-flight operational metrics from the merged table, and the scorer
//! converts those metrics into within-day percentile ranks, a composite
//! 0-100 difficulty score, a dense daily rank, and a three-tier class.

pub mod classify;
pub mod features;
pub mod rank;
pub mod scoring;
pub mod types;
