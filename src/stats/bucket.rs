//! Metric buckets keyed by a breakdown dimension (city, state, chain).

use std::collections::HashMap;

use crate::domain::Metrics;
use crate::stats::round2;

/// Summed metrics for one dimension key.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatBucket {
    pub gross: f64,
    pub sold: f64,
    pub shows: f64,
    pub occ_sum: f64,
    pub days: u32,
}

impl StatBucket {
    pub fn add(&mut self, m: &Metrics) {
        self.gross += m.gross;
        self.sold += m.sold;
        self.shows += m.shows;
        self.occ_sum += m.occupancy;
        self.days += 1;
    }

    /// Mean occupancy rounded to 2dp, `0` when nothing contributed.
    pub fn avg_occupancy(&self) -> f64 {
        if self.days == 0 {
            return 0.0;
        }
        round2(self.occ_sum / f64::from(self.days))
    }
}

/// Buckets keyed by dimension, iterated in first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct BucketMap {
    entries: Vec<(String, StatBucket)>,
    index: HashMap<String, usize>,
}

impl BucketMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observation into the bucket for `key`, creating it at zero.
    pub fn add_observation(&mut self, key: &str, metrics: &Metrics) {
        let pos = match self.index.get(key) {
            Some(&pos) => pos,
            None => {
                self.entries.push((key.to_string(), StatBucket::default()));
                let pos = self.entries.len() - 1;
                self.index.insert(key.to_string(), pos);
                pos
            }
        };
        self.entries[pos].1.add(metrics);
    }

    pub fn get(&self, key: &str) -> Option<&StatBucket> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatBucket)> {
        self.entries.iter().map(|(k, b)| (k.as_str(), b))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(gross: f64, sold: f64, shows: f64, occupancy: f64) -> Metrics {
        Metrics {
            gross,
            sold,
            shows,
            occupancy,
        }
    }

    #[test]
    fn accumulates_sums_and_days() {
        let mut map = BucketMap::new();
        map.add_observation("Delhi", &m(100.0, 2.0, 1.0, 40.0));
        map.add_observation("Delhi", &m(50.0, 1.0, 1.0, 45.0));
        map.add_observation("Pune", &m(10.0, 1.0, 1.0, 10.0));

        let delhi = map.get("Delhi").unwrap();
        assert_eq!(delhi.gross, 150.0);
        assert_eq!(delhi.sold, 3.0);
        assert_eq!(delhi.shows, 2.0);
        assert_eq!(delhi.occ_sum, 85.0);
        assert_eq!(delhi.days, 2);
        assert_eq!(delhi.avg_occupancy(), 42.5);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn zero_day_average_is_zero() {
        assert_eq!(StatBucket::default().avg_occupancy(), 0.0);
    }

    #[test]
    fn iteration_follows_first_insertion() {
        let mut map = BucketMap::new();
        for key in ["b", "a", "c", "a", "b"] {
            map.add_observation(key, &Metrics::default());
        }
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);

        map.clear();
        assert!(map.is_empty());
        assert!(map.get("a").is_none());
    }
}
