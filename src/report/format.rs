//! Formatted terminal output.
//!
//! Kept apart from the engine so output tweaks never touch aggregation code.

use crate::app::pipeline::YearReport;
use crate::domain::{LeaderRow, MovieRecord, YearDocument};
use crate::io::DocumentOrigin;
use crate::report::rank_movies;

/// One block per year run.
pub fn format_sync_reports(reports: &[YearReport]) -> String {
    let mut out = String::new();
    for r in reports {
        out.push_str(&format!(
            "{}: fetched {}/{} dates, {} movies\n",
            r.year, r.merged, r.attempted, r.movies
        ));
        if !r.skipped.is_empty() {
            out.push_str(&format!(
                "  skipped {} dates: {}\n",
                r.skipped.len(),
                abbreviate(&r.skipped, 8)
            ));
        }
        if let DocumentOrigin::RecoveredFromCorrupt { reason, backup } = &r.origin {
            out.push_str(&format!(
                "  WARNING: persisted document was corrupt ({reason}) and was rebuilt from scratch\n"
            ));
            if let Some(path) = backup {
                out.push_str(&format!("  original kept at {}\n", path.display()));
            }
        }
    }
    out
}

/// Year overview: top movies by gross, or one movie in detail.
pub fn format_year_summary(doc: &YearDocument, top_n: usize, movie: Option<&str>) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Box office {} ===\n", doc.year));
    if !doc.last_updated.is_empty() {
        out.push_str(&format!("Last updated: {}\n", doc.last_updated));
    }
    out.push_str(&format!("Movies tracked: {}\n", doc.movies.len()));

    if let Some(name) = movie {
        match doc.movies.get(name) {
            Some(record) => out.push_str(&format_movie(name, record)),
            None => out.push_str(&format!("\nNo movie named '{name}' in {}.\n", doc.year)),
        }
        return out;
    }

    out.push_str(&format!(
        "\n{:<4} {:<40} {:>16} {:>12} {:>8} {:>7} {:>5}\n",
        "#", "Movie", "Gross", "Sold", "Shows", "Occ%", "Days"
    ));
    for (i, (name, m)) in rank_movies(doc, top_n).into_iter().enumerate() {
        out.push_str(&format!(
            "{:<4} {:<40} {:>16.0} {:>12.0} {:>8.0} {:>7.2} {:>5}\n",
            i + 1,
            truncate(name, 40),
            m.totals.gross,
            m.totals.sold,
            m.totals.shows,
            m.totals.avg_occ,
            m.daily.len()
        ));
    }
    out
}

fn format_movie(name: &str, m: &MovieRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{name}\n"));
    out.push_str(&format!(
        "Totals: gross={:.0} sold={:.0} shows={:.0} avgOcc={:.2}% over {} days\n",
        m.totals.gross,
        m.totals.sold,
        m.totals.shows,
        m.totals.avg_occ,
        m.daily.len()
    ));
    if let (Some(first), Some(last)) = (m.daily.keys().next(), m.daily.keys().next_back()) {
        out.push_str(&format!("Span: {first} .. {last}\n"));
    }
    out.push_str(&format_board("Top cities", &m.top_cities));
    out.push_str(&format_board("Top states", &m.top_states));
    out.push_str(&format_board("Top chains", &m.top_chains));
    out
}

fn format_board(title: &str, rows: &[LeaderRow]) -> String {
    let mut out = format!("\n{title}:\n");
    if rows.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }
    for r in rows {
        out.push_str(&format!(
            "  {:<24} {:>14.0} {:>10.0} {:>7.0} {:>7.2}\n",
            truncate(&r.key, 24),
            r.gross,
            r.sold,
            r.shows,
            r.avg_occ
        ));
    }
    out
}

fn abbreviate(keys: &[String], max: usize) -> String {
    if keys.len() <= max {
        return keys.join(", ");
    }
    format!("{}, ... (+{})", keys[..max].join(", "), keys.len() - max)
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut t: String = s.chars().take(width.saturating_sub(1)).collect();
    t.push('…');
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DayFigures;
    use std::path::PathBuf;

    #[test]
    fn corrupt_recovery_is_called_out() {
        let report = YearReport {
            year: 2024,
            origin: DocumentOrigin::RecoveredFromCorrupt {
                reason: "EOF while parsing".to_string(),
                backup: Some(PathBuf::from("/data/2024.json.corrupt-x")),
            },
            attempted: 3,
            merged: 2,
            skipped: vec!["20240102".to_string()],
            movies: 4,
        };

        let text = format_sync_reports(&[report]);
        assert!(text.contains("2024: fetched 2/3 dates, 4 movies"));
        assert!(text.contains("skipped 1 dates: 20240102"));
        assert!(text.contains("WARNING"));
        assert!(text.contains("/data/2024.json.corrupt-x"));
    }

    #[test]
    fn movie_detail_lists_boards() {
        let mut doc = YearDocument::empty(2024);
        let mut m = MovieRecord::default();
        m.daily.insert("20240101".to_string(), DayFigures::default());
        m.daily.insert("20240109".to_string(), DayFigures::default());
        m.top_chains.push(LeaderRow {
            key: "PVR".to_string(),
            gross: 10.0,
            sold: 1.0,
            shows: 1.0,
            avg_occ: 12.5,
        });
        doc.movies.insert("Stree 2".to_string(), m);

        let text = format_year_summary(&doc, 10, Some("Stree 2"));
        assert!(text.contains("Span: 20240101 .. 20240109"));
        assert!(text.contains("PVR"));
        assert!(text.contains("Top cities:\n  (none)"));

        let missing = format_year_summary(&doc, 10, Some("Nope"));
        assert!(missing.contains("No movie named 'Nope'"));
    }

    #[test]
    fn long_keys_are_truncated() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
        assert_eq!(abbreviate(&["a".to_string(), "b".to_string(), "c".to_string()], 2), "a, b, ... (+1)");
    }
}
