//! Running totals.

use crate::domain::{MovieRecord, Totals};
use crate::stats::round2;

/// Recompute `record.totals` from `record.daily` alone.
///
/// Totals are never incremented in place; this is the only writer, so they are
/// correct regardless of which dates were merged, skipped, or merged twice.
pub fn rebuild_totals(record: &mut MovieRecord) {
    let mut totals = Totals::default();
    let mut occ_sum = 0.0;

    for day in record.daily.values() {
        totals.gross += day.gross;
        totals.sold += day.sold;
        totals.shows += day.shows;
        occ_sum += day.occupancy;
    }

    let days = record.daily.len();
    totals.avg_occ = if days == 0 {
        0.0
    } else {
        round2(occ_sum / days as f64)
    };

    record.totals = totals;
}
