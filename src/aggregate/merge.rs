//! Per-day merge.
//!
//! A date's figures are always replaced, never added to, so merging the same
//! snapshot twice (or refreshing today's numbers every hour) leaves the record
//! in the same state as a single merge.

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::{DayBreakdown, DayFigures, MovieRecord, RawDay, RawMovie, YearDocument};
use crate::stats::BucketMap;

/// Initialize any missing sub-structure of a record without touching the rest.
pub fn repair_record(record: &mut MovieRecord) {
    record.city_map.get_or_insert_with(BucketMap::new);
    record.state_map.get_or_insert_with(BucketMap::new);
    record.chain_map.get_or_insert_with(BucketMap::new);
}

/// Repair every record and make sure the fetched-dates ledger exists.
///
/// Documents written before the ledger existed get it seeded from the daily
/// keys present on any movie.
pub fn repair_document(doc: &mut YearDocument) {
    for record in doc.movies.values_mut() {
        repair_record(record);
    }

    if doc.fetched_dates.is_none() {
        let seeded: BTreeSet<String> = doc
            .movies
            .values()
            .flat_map(|m| m.daily.keys().cloned())
            .collect();
        debug!("Seeded {} fetched-dates ledger with {} dates", doc.year, seeded.len());
        doc.fetched_dates = Some(seeded);
    }
}

/// Apply one day's data for one movie.
pub fn merge_day(record: &mut MovieRecord, date_key: &str, movie: &RawMovie) {
    repair_record(record);

    record
        .daily
        .insert(date_key.to_string(), DayFigures::from(movie.metrics));

    record.pending.insert(
        date_key.to_string(),
        DayBreakdown {
            regions: movie.details.clone(),
            chains: movie.chain_details.clone(),
        },
    );
}

/// Merge a whole snapshot into the document and mark its date as fetched.
pub fn merge_snapshot(doc: &mut YearDocument, date_key: &str, day: &RawDay) {
    if let Some(ts) = &day.last_updated {
        doc.last_updated = ts.clone();
    }

    for (name, movie) in &day.movies {
        let record = doc.movies.entry(name.clone()).or_default();
        merge_day(record, date_key, movie);
    }

    doc.fetched_dates
        .get_or_insert_with(BTreeSet::new)
        .insert(date_key.to_string());
}
