//! Persisted yearly document.
//!
//! The JSON shape is shared with documents written by earlier tooling, so field
//! names stay camelCase and the daily/leaderboard entries serialize as plain
//! arrays rather than objects.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::snapshot::{ChainRow, Metrics, RegionRow, number};
use crate::stats::BucketMap;

/// Dimension key used when a breakdown row carries no city/state/chain.
pub const MISSING_KEY: &str = "NA";

/// Stored cells may be `null` or numeric strings; they read as numbers or `0`.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Value::deserialize(deserializer).map(|v| number(Some(&v)))
}

fn cell(value: &Value, index: usize) -> f64 {
    number(value.get(index))
}

/// One day's figures for one movie, stored as `[gross, sold, shows, occupancy]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "(f64, f64, f64, f64)")]
pub struct DayFigures {
    pub gross: f64,
    pub sold: f64,
    pub shows: f64,
    pub occupancy: f64,
}

impl From<(f64, f64, f64, f64)> for DayFigures {
    fn from((gross, sold, shows, occupancy): (f64, f64, f64, f64)) -> Self {
        Self {
            gross,
            sold,
            shows,
            occupancy,
        }
    }
}

impl From<Value> for DayFigures {
    fn from(v: Value) -> Self {
        Self {
            gross: cell(&v, 0),
            sold: cell(&v, 1),
            shows: cell(&v, 2),
            occupancy: cell(&v, 3),
        }
    }
}

impl From<DayFigures> for (f64, f64, f64, f64) {
    fn from(d: DayFigures) -> Self {
        (d.gross, d.sold, d.shows, d.occupancy)
    }
}

impl From<Metrics> for DayFigures {
    fn from(m: Metrics) -> Self {
        Self {
            gross: m.gross,
            sold: m.sold,
            shows: m.shows,
            occupancy: m.occupancy,
        }
    }
}

/// Running totals derived from a movie's daily series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Totals {
    #[serde(deserialize_with = "lenient_number")]
    pub gross: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub sold: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub shows: f64,
    #[serde(rename = "avgOcc", deserialize_with = "lenient_number")]
    pub avg_occ: f64,
}

/// A leaderboard row, stored as `[key, gross, sold, shows, avgOccupancy]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "(String, f64, f64, f64, f64)")]
pub struct LeaderRow {
    pub key: String,
    pub gross: f64,
    pub sold: f64,
    pub shows: f64,
    pub avg_occ: f64,
}

impl From<(String, f64, f64, f64, f64)> for LeaderRow {
    fn from((key, gross, sold, shows, avg_occ): (String, f64, f64, f64, f64)) -> Self {
        Self {
            key,
            gross,
            sold,
            shows,
            avg_occ,
        }
    }
}

impl From<Value> for LeaderRow {
    fn from(v: Value) -> Self {
        let key = match v.get(0) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => MISSING_KEY.to_string(),
        };
        Self {
            key,
            gross: cell(&v, 1),
            sold: cell(&v, 2),
            shows: cell(&v, 3),
            avg_occ: cell(&v, 4),
        }
    }
}

impl From<LeaderRow> for (String, f64, f64, f64, f64) {
    fn from(r: LeaderRow) -> Self {
        (r.key, r.gross, r.sold, r.shows, r.avg_occ)
    }
}

/// Breakdown rows received for one date during the current run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayBreakdown {
    pub regions: Vec<RegionRow>,
    pub chains: Vec<ChainRow>,
}

/// Everything the document knows about one movie.
///
/// The bucket maps and pending breakdown rows are transient: they only live for
/// the duration of a run and are never written to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    #[serde(default)]
    pub daily: BTreeMap<String, DayFigures>,
    #[serde(default)]
    pub totals: Totals,

    #[serde(skip)]
    pub city_map: Option<BucketMap>,
    #[serde(skip)]
    pub state_map: Option<BucketMap>,
    #[serde(skip)]
    pub chain_map: Option<BucketMap>,
    #[serde(skip)]
    pub pending: BTreeMap<String, DayBreakdown>,

    #[serde(default)]
    pub top_cities: Vec<LeaderRow>,
    #[serde(default)]
    pub top_states: Vec<LeaderRow>,
    #[serde(default)]
    pub top_chains: Vec<LeaderRow>,
}

/// The per-year database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YearDocument {
    pub year: i32,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub movies: BTreeMap<String, MovieRecord>,
    /// Date keys whose snapshot has been merged. `None` only for documents
    /// written before the ledger existed; repair seeds it.
    #[serde(
        rename = "fetchedDates",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub fetched_dates: Option<BTreeSet<String>>,
}

impl YearDocument {
    /// A freshly initialized, empty document.
    pub fn empty(year: i32) -> Self {
        Self {
            year,
            last_updated: String::new(),
            movies: BTreeMap::new(),
            fetched_dates: Some(BTreeSet::new()),
        }
    }

    /// Whether the snapshot for `date_key` has already been merged.
    pub fn has_date(&self, date_key: &str) -> bool {
        match &self.fetched_dates {
            Some(ledger) => ledger.contains(date_key),
            None => self
                .movies
                .values()
                .any(|m| m.daily.contains_key(date_key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_and_leaderboards_serialize_as_arrays() {
        let mut record = MovieRecord::default();
        record.daily.insert(
            "20240101".to_string(),
            DayFigures::from((1000.0, 10.0, 5.0, 50.0)),
        );
        record.top_cities.push(LeaderRow::from((
            "Mumbai".to_string(),
            1000.0,
            10.0,
            5.0,
            50.0,
        )));
        record.city_map = Some(BucketMap::default());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["daily"]["20240101"], serde_json::json!([1000.0, 10.0, 5.0, 50.0]));
        assert_eq!(
            json["topCities"][0],
            serde_json::json!(["Mumbai", 1000.0, 10.0, 5.0, 50.0])
        );
        assert!(json.get("cityMap").is_none());
        assert!(json["totals"].get("avgOcc").is_some());
    }

    #[test]
    fn legacy_document_without_ledger_loads() {
        let raw = r#"{"year":2024,"last_updated":"x","movies":{"X":{"daily":{"20240101":[1,2,3,4.5]},"totals":{"gross":1,"sold":2,"shows":3,"avgOcc":4.5},"topCities":[],"topStates":[],"topChains":[]}}}"#;
        let doc: YearDocument = serde_json::from_str(raw).unwrap();
        assert!(doc.fetched_dates.is_none());
        assert!(doc.has_date("20240101"));
        assert!(!doc.has_date("20240102"));
        assert_eq!(doc.movies["X"].daily["20240101"].occupancy, 4.5);
    }

    #[test]
    fn record_missing_substructures_still_deserializes() {
        let doc: YearDocument =
            serde_json::from_str(r#"{"year":2023,"movies":{"Y":{"daily":{}}}}"#).unwrap();
        let y = &doc.movies["Y"];
        assert_eq!(y.totals, Totals::default());
        assert!(y.top_chains.is_empty());
        assert_eq!(doc.last_updated, "");
    }

    #[test]
    fn null_and_string_cells_read_as_numbers() {
        let raw = r#"{"year":2024,"movies":{"X":{"daily":{"20240101":[null,"1",1,1],"20240102":[5]},"totals":{"gross":"7","sold":null},"topCities":[["Pune",null,"2",1,1],[null,1,1,1,1]]}}}"#;
        let doc: YearDocument = serde_json::from_str(raw).unwrap();
        let x = &doc.movies["X"];

        assert_eq!(
            x.daily["20240101"],
            DayFigures::from((0.0, 1.0, 1.0, 1.0))
        );
        assert_eq!(x.daily["20240102"], DayFigures::from((5.0, 0.0, 0.0, 0.0)));
        assert_eq!((x.totals.gross, x.totals.sold), (7.0, 0.0));
        assert_eq!(x.top_cities[0].sold, 2.0);
        assert_eq!(x.top_cities[1].key, MISSING_KEY);
    }
}
