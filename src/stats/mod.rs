//! Breakdown statistics.
//!
//! - `bucket`: per-key metric accumulation (`StatBucket`, `BucketMap`)
//! - `rank`: reduction of a bucket map into a bounded leaderboard

pub mod bucket;
pub mod rank;

pub use bucket::*;
pub use rank::*;

/// Round to two decimal places.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
