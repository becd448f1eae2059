//! Finalization: breakdown buckets → leaderboards.

use tracing::debug;

use crate::aggregate::{rebuild_totals, repair_record};
use crate::domain::{MovieRecord, YearDocument};
use crate::stats::{BucketMap, TOP_N, rank_top};

/// Reset the three bucket maps and refill them from this run's breakdown rows.
///
/// Each recorded date contributes exactly once, however many times it was
/// merged during the run.
pub fn rebuild_breakdowns(record: &mut MovieRecord) {
    repair_record(record);

    let mut cities = BucketMap::new();
    let mut states = BucketMap::new();
    let mut chains = BucketMap::new();

    for day in record.pending.values() {
        for row in &day.regions {
            cities.add_observation(&row.city, &row.metrics);
            states.add_observation(&row.state, &row.metrics);
        }
        for row in &day.chains {
            chains.add_observation(&row.chain, &row.metrics);
        }
    }

    record.city_map = Some(cities);
    record.state_map = Some(states);
    record.chain_map = Some(chains);
}

/// Replace the transient bucket maps with top-N leaderboards.
///
/// A record that saw no breakdown rows this run keeps its existing
/// leaderboards. Either way the transient state is dropped afterwards.
pub fn finalize(record: &mut MovieRecord) {
    if !record.pending.is_empty() {
        rebuild_breakdowns(record);
        if let Some(map) = &record.city_map {
            record.top_cities = rank_top(map, TOP_N);
        }
        if let Some(map) = &record.state_map {
            record.top_states = rank_top(map, TOP_N);
        }
        if let Some(map) = &record.chain_map {
            record.top_chains = rank_top(map, TOP_N);
        }
    }

    record.city_map = None;
    record.state_map = None;
    record.chain_map = None;
    record.pending.clear();
}

/// Rebuild totals and finalize every movie in the document.
pub fn reconcile_document(doc: &mut YearDocument) {
    for (name, record) in doc.movies.iter_mut() {
        rebuild_totals(record);
        finalize(record);
        debug!(
            "Reconciled '{}': {} days, gross {:.0}",
            name,
            record.daily.len(),
            record.totals.gross
        );
    }
}
