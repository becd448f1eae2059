//! Raw per-day snapshot as published by the data provider.
//!
//! The provider's payloads are loosely typed: fields go missing, numbers arrive
//! as strings, breakdown arrays are sometimes `null`. Parsing is therefore done
//! by hand over `serde_json::Value` and is lenient everywhere except for the
//! top-level `movies` mapping, whose absence marks the snapshot as unusable.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::domain::types::MISSING_KEY;
use crate::error::AppError;

/// The four metrics every movie row and breakdown row carries.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    pub gross: f64,
    pub sold: f64,
    pub shows: f64,
    pub occupancy: f64,
}

/// A `details` row: figures for one city within one state.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRow {
    pub city: String,
    pub state: String,
    pub metrics: Metrics,
}

/// A `chain_details` row: figures for one distribution chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainRow {
    pub chain: String,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawMovie {
    pub metrics: Metrics,
    pub details: Vec<RegionRow>,
    pub chain_details: Vec<ChainRow>,
}

/// One day's snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawDay {
    pub last_updated: Option<String>,
    pub movies: BTreeMap<String, RawMovie>,
}

impl RawDay {
    /// Parse a decoded provider payload.
    ///
    /// Fails only when the payload is not an object or has no `movies` object.
    pub fn from_json(value: &Value) -> Result<Self, AppError> {
        let obj = value
            .as_object()
            .ok_or_else(|| AppError::data("Snapshot payload is not a JSON object."))?;

        let movies = obj
            .get("movies")
            .and_then(Value::as_object)
            .ok_or_else(|| AppError::data("Snapshot payload has no 'movies' mapping."))?;

        let last_updated = match obj.get("last_updated") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };

        let movies = movies
            .iter()
            .map(|(name, raw)| (name.clone(), RawMovie::from_json(raw)))
            .collect();

        Ok(Self {
            last_updated,
            movies,
        })
    }
}

impl RawMovie {
    /// Parse one movie entry. Never fails; anything unusable reads as zero/empty.
    pub fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let details = rows(obj, &["details"])
            .map(|row| RegionRow {
                city: dimension(row, "city"),
                state: dimension(row, "state"),
                metrics: metrics(row),
            })
            .collect();

        // Older payloads capitalize the chain breakdown key.
        let chain_details = rows(obj, &["chain_details", "Chain_details"])
            .map(|row| ChainRow {
                chain: dimension(row, "chain"),
                metrics: metrics(row),
            })
            .collect();

        Self {
            metrics: metrics(obj),
            details,
            chain_details,
        }
    }
}

fn rows<'a>(
    obj: &'a Map<String, Value>,
    keys: &[&str],
) -> impl Iterator<Item = &'a Map<String, Value>> + 'a {
    keys.iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_array))
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn metrics(obj: &Map<String, Value>) -> Metrics {
    Metrics {
        gross: number(obj.get("gross")),
        sold: number(obj.get("sold")),
        shows: number(obj.get("shows")),
        occupancy: number(obj.get("occupancy")),
    }
}

/// Coerce a loosely typed metric to `f64`; missing or non-numeric reads as `0`.
pub fn number(value: Option<&Value>) -> f64 {
    let v = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if v.is_finite() { v } else { 0.0 }
}

fn dimension(obj: &Map<String, Value>, field: &str) -> String {
    match obj.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => MISSING_KEY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_movie_entry() {
        let payload = json!({
            "last_updated": "2024-03-01 18:00",
            "movies": {
                "X": {
                    "gross": 1000, "sold": 10, "shows": 5, "occupancy": 50.5,
                    "details": [{"city": "Pune", "state": "MH", "gross": 400, "sold": 4, "shows": 2, "occupancy": 40}],
                    "chain_details": [{"chain": "PVR", "gross": 600, "sold": 6, "shows": 3, "occupancy": 60}]
                }
            }
        });

        let day = RawDay::from_json(&payload).unwrap();
        assert_eq!(day.last_updated.as_deref(), Some("2024-03-01 18:00"));
        let x = &day.movies["X"];
        assert_eq!(x.metrics.gross, 1000.0);
        assert_eq!(x.metrics.occupancy, 50.5);
        assert_eq!(x.details[0].city, "Pune");
        assert_eq!(x.details[0].state, "MH");
        assert_eq!(x.chain_details[0].chain, "PVR");
        assert_eq!(x.chain_details[0].metrics.shows, 3.0);
    }

    #[test]
    fn missing_movies_is_an_error() {
        assert!(RawDay::from_json(&json!({"last_updated": "x"})).is_err());
        assert!(RawDay::from_json(&json!({"movies": null})).is_err());
        assert!(RawDay::from_json(&json!([1, 2])).is_err());
    }

    #[test]
    fn lenient_fields_default_to_zero_and_na() {
        let payload = json!({
            "movies": {
                "Y": {
                    "gross": "12.5", "sold": null, "occupancy": "n/a",
                    "details": [{"gross": 3}, "garbage"],
                    "Chain_details": [{"chain": "INOX"}]
                },
                "Z": null
            }
        });

        let day = RawDay::from_json(&payload).unwrap();
        assert!(day.last_updated.is_none());

        let y = &day.movies["Y"];
        assert_eq!(y.metrics.gross, 12.5);
        assert_eq!(y.metrics.sold, 0.0);
        assert_eq!(y.metrics.shows, 0.0);
        assert_eq!(y.metrics.occupancy, 0.0);
        assert_eq!(y.details.len(), 1);
        assert_eq!(y.details[0].city, MISSING_KEY);
        assert_eq!(y.details[0].state, MISSING_KEY);
        assert_eq!(y.chain_details[0].chain, "INOX");
        assert_eq!(y.chain_details[0].metrics, Metrics::default());

        assert_eq!(day.movies["Z"], RawMovie::default());
    }
}
