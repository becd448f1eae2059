//! Reporting utilities: movie rankings and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{MovieRecord, YearDocument};

/// Movies ordered by total gross (descending), first `top_n` only.
pub fn rank_movies(doc: &YearDocument, top_n: usize) -> Vec<(&str, &MovieRecord)> {
    let mut sorted: Vec<(&str, &MovieRecord)> =
        doc.movies.iter().map(|(name, m)| (name.as_str(), m)).collect();
    sorted.sort_by(|a, b| {
        b.1.totals
            .gross
            .partial_cmp(&a.1.totals.gross)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted.truncate(top_n);
    sorted
}
