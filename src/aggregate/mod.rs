//! Folding snapshots into the yearly document.
//!
//! - `merge`: idempotent per-day merge + self-healing repair
//! - `totals`: running totals recomputed from the daily series
//! - `finalize`: breakdown buckets → top-N leaderboards

pub mod finalize;
pub mod merge;
pub mod totals;

pub use finalize::*;
pub use merge::*;
pub use totals::*;
