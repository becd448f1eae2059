//! Year reconciliation: the workflow shared by every subcommand.
//!
//! load → detect gaps → fetch & merge each missing date → rebuild totals and
//! leaderboards → save
//!
//! The driver owns the document for the duration of a year and hands it by
//! `&mut` to the merge/reconcile steps. Years are processed one after another,
//! each loaded and saved on its own.

use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::aggregate::{merge_snapshot, reconcile_document, repair_document};
use crate::data::SnapshotProvider;
use crate::domain::YearDocument;
use crate::error::AppError;
use crate::io::{DocumentOrigin, LoadedYear, YearStore};
use crate::time::{date_key, year_dates};

/// How a year's document is obtained before fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Load the persisted document and fetch only what is missing (plus today).
    Incremental,
    /// Start from an empty document and fetch every date.
    Rebuild,
}

/// Rate limiting between upstream requests.
pub trait Pacer {
    /// Called once after every fetch attempt, successful or not.
    fn pause(&mut self);
}

/// Sleeps for a fixed delay.
pub struct SleepPacer(pub Duration);

impl Pacer for SleepPacer {
    fn pause(&mut self) {
        if !self.0.is_zero() {
            thread::sleep(self.0);
        }
    }
}

/// Outcome of one year's run.
#[derive(Debug, Clone)]
pub struct YearReport {
    pub year: i32,
    pub origin: DocumentOrigin,
    /// Dates requested from the provider.
    pub attempted: usize,
    /// Dates merged into the document.
    pub merged: usize,
    /// Dates whose fetch failed, as `YYYYMMDD` keys.
    pub skipped: Vec<String>,
    pub movies: usize,
}

impl YearReport {
    pub fn recovered_from_corrupt(&self) -> bool {
        matches!(self.origin, DocumentOrigin::RecoveredFromCorrupt { .. })
    }
}

/// Dates of `year` (up to `today`) that need fetching.
///
/// Today is always included because its figures keep changing during the day.
pub fn missing_dates(doc: &YearDocument, year: i32, today: NaiveDate) -> Vec<NaiveDate> {
    year_dates(year, today)
        .into_iter()
        .filter(|d| *d == today || !doc.has_date(&date_key(*d)))
        .collect()
}

/// Bring one year's document up to date and persist it.
pub fn sync_year(
    provider: &dyn SnapshotProvider,
    store: &dyn YearStore,
    pacer: &mut dyn Pacer,
    year: i32,
    today: NaiveDate,
    mode: SyncMode,
) -> Result<YearReport, AppError> {
    let LoadedYear {
        document: mut doc,
        origin,
    } = match mode {
        SyncMode::Incremental => store.load(year)?,
        SyncMode::Rebuild => LoadedYear::fresh(year),
    };
    repair_document(&mut doc);

    let dates = missing_dates(&doc, year, today);
    info!("{year}: {} dates to fetch", dates.len());

    let mut merged = 0;
    let mut skipped = Vec::new();

    for date in &dates {
        let key = date_key(*date);
        debug!("Fetch {date}");

        match provider.fetch(*date) {
            Ok(day) => {
                merge_snapshot(&mut doc, &key, &day);
                merged += 1;
            }
            Err(e) => {
                warn!("Skipping {date}: {e}");
                skipped.push(key);
            }
        }

        pacer.pause();
    }

    reconcile_document(&mut doc);
    store.save(&doc)?;

    let report = YearReport {
        year,
        origin,
        attempted: dates.len(),
        merged,
        skipped,
        movies: doc.movies.len(),
    };
    info!(
        "{year}: merged {}/{} dates, {} movies",
        report.merged, report.attempted, report.movies
    );
    Ok(report)
}

/// Sync every year in `years`, in order.
///
/// A failing year (e.g. its save fails) does not stop the following years; the
/// first error is returned after all years ran.
pub fn run_years(
    provider: &dyn SnapshotProvider,
    store: &dyn YearStore,
    pacer: &mut dyn Pacer,
    years: &[i32],
    today: NaiveDate,
    mode: SyncMode,
) -> Result<Vec<YearReport>, AppError> {
    let mut reports = Vec::with_capacity(years.len());
    let mut first_err = None;

    for &year in years {
        match sync_year(provider, store, pacer, year, today, mode) {
            Ok(report) => reports.push(report),
            Err(e) => {
                warn!("{year} failed: {e}");
                first_err.get_or_insert(e);
            }
        }
    }

    match first_err {
        Some(e) => Err(e),
        None => Ok(reports),
    }
}

/// Recompute totals of a persisted year without fetching anything.
///
/// Leaderboards are left as they are since no breakdown rows are available.
pub fn reconcile_year(store: &dyn YearStore, year: i32) -> Result<YearReport, AppError> {
    let LoadedYear {
        document: mut doc,
        origin,
    } = store.load(year)?;
    repair_document(&mut doc);
    reconcile_document(&mut doc);
    store.save(&doc)?;

    Ok(YearReport {
        year,
        origin,
        attempted: 0,
        merged: 0,
        skipped: Vec::new(),
        movies: doc.movies.len(),
    })
}
