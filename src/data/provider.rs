use chrono::NaiveDate;

use crate::domain::RawDay;
use crate::error::AppError;

/// Source of per-day snapshots.
///
/// Any error means "no data for this date"; callers skip the date and move on.
pub trait SnapshotProvider {
    fn fetch(&self, date: NaiveDate) -> Result<RawDay, AppError>;
}
