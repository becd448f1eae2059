//! Top-N leaderboards.

use crate::domain::LeaderRow;
use crate::stats::BucketMap;

/// Leaderboard size kept in the persisted document.
pub const TOP_N: usize = 5;

/// Rank buckets by gross (descending) and keep the first `n`.
///
/// Ties keep the map's insertion order.
pub fn rank_top(map: &BucketMap, n: usize) -> Vec<LeaderRow> {
    let mut rows: Vec<LeaderRow> = map
        .iter()
        .map(|(key, b)| LeaderRow {
            key: key.to_string(),
            gross: b.gross,
            sold: b.sold,
            shows: b.shows,
            avg_occ: b.avg_occupancy(),
        })
        .collect();

    rows.sort_by(|a, b| b.gross.partial_cmp(&a.gross).unwrap_or(std::cmp::Ordering::Equal));
    rows.truncate(n);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Metrics;

    fn gross(g: f64) -> Metrics {
        Metrics {
            gross: g,
            sold: 1.0,
            shows: 1.0,
            occupancy: 30.0,
        }
    }

    #[test]
    fn keeps_top_five_by_gross() {
        let mut map = BucketMap::new();
        let grosses = [500.0, 400.0, 300.0, 200.0, 100.0, 90.0, 80.0];
        for (i, g) in grosses.iter().enumerate() {
            map.add_observation(&format!("city{i}"), &gross(*g));
        }

        let top = rank_top(&map, TOP_N);
        assert_eq!(top.len(), 5);
        let got: Vec<f64> = top.iter().map(|r| r.gross).collect();
        assert_eq!(got, vec![500.0, 400.0, 300.0, 200.0, 100.0]);
        assert!(top.iter().all(|r| r.key != "city5" && r.key != "city6"));
    }

    #[test]
    fn sorts_descending_and_keeps_all_when_small() {
        let mut map = BucketMap::new();
        map.add_observation("low", &gross(10.0));
        map.add_observation("high", &gross(90.0));
        map.add_observation("mid", &gross(50.0));

        let top = rank_top(&map, TOP_N);
        let keys: Vec<&str> = top.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["high", "mid", "low"]);
        assert_eq!(top[0].avg_occ, 30.0);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut map = BucketMap::new();
        map.add_observation("first", &gross(100.0));
        map.add_observation("second", &gross(100.0));
        map.add_observation("third", &gross(200.0));

        let top = rank_top(&map, TOP_N);
        let keys: Vec<&str> = top.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["third", "first", "second"]);
    }

    #[test]
    fn empty_map_yields_empty_board() {
        assert!(rank_top(&BucketMap::new(), TOP_N).is_empty());
    }
}
