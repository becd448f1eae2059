//! HTTP snapshot provider for the public box-office feed.
//!
//! The feed is split across hosts:
//! - a live host serving recent days under `/daily/data/{YYYYMMDD}/finalsummary.json`
//! - yearly archive hosts serving `/daily/data/{YYYY}/{MM-DD}_finalsummary.json`
//!
//! Everything up to the end of 2025 lives on the 2025 archive host.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use reqwest::blocking::{Client, Response};
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::data::provider::SnapshotProvider;
use crate::domain::RawDay;
use crate::error::AppError;
use crate::time::is_more_than_one_month_old;

/// Oldest archive host; earlier years are served from it as well.
const FIRST_ARCHIVE_HOST_YEAR: i32 = 2025;

/// Primary URL and the URL tried when the primary answers with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub primary: String,
    pub fallback: String,
}

pub struct HttpSnapshotProvider {
    client: Client,
    live_base: String,
    archive_base: String,
}

impl HttpSnapshotProvider {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::local(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            live_base: config.live_base.clone(),
            archive_base: config.archive_base.clone(),
        })
    }

    /// Decide which URLs serve `date`, given the current UTC instant.
    pub fn route(&self, date: NaiveDate, now: DateTime<Utc>) -> Route {
        let archive = self.archive_url(date);
        let archived = date.year() <= FIRST_ARCHIVE_HOST_YEAR || is_more_than_one_month_old(date, now);

        if archived {
            Route {
                primary: archive.clone(),
                fallback: archive,
            }
        } else {
            Route {
                primary: format!(
                    "{}/daily/data/{}/finalsummary.json",
                    self.live_base,
                    date.format("%Y%m%d")
                ),
                fallback: archive,
            }
        }
    }

    fn archive_url(&self, date: NaiveDate) -> String {
        let host_year = date.year().max(FIRST_ARCHIVE_HOST_YEAR);
        let host = self.archive_base.replace("{year}", &host_year.to_string());
        format!(
            "{host}/daily/data/{}/{}_finalsummary.json",
            date.year(),
            date.format("%m-%d")
        )
    }

    fn get(&self, url: &str, cache_buster: &str) -> Result<Response, AppError> {
        self.client
            .get(url)
            .query(&[("_", cache_buster)])
            .send()
            .map_err(|e| AppError::data(format!("Snapshot request failed for {url}: {e}")))
    }
}

impl SnapshotProvider for HttpSnapshotProvider {
    fn fetch(&self, date: NaiveDate) -> Result<RawDay, AppError> {
        let now = Utc::now();
        let route = self.route(date, now);
        let cache_buster = now.timestamp_millis().to_string();

        let mut resp = self.get(&route.primary, &cache_buster)?;
        if !resp.status().is_success() {
            debug!(
                "{} answered {} for {date}; trying {}",
                route.primary,
                resp.status(),
                route.fallback
            );
            resp = self.get(&route.fallback, &cache_buster)?;
        }

        if !resp.status().is_success() {
            return Err(AppError::data(format!(
                "Snapshot for {date} unavailable (status {}).",
                resp.status()
            )));
        }

        let body: Value = resp
            .json()
            .map_err(|e| AppError::data(format!("Failed to decode snapshot for {date}: {e}")))?;

        RawDay::from_json(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn provider() -> HttpSnapshotProvider {
        HttpSnapshotProvider::new(&Config::default()).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn legacy_years_use_the_2025_archive_host() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let route = provider().route(d(2023, 4, 7), now);
        assert_eq!(
            route.primary,
            "https://bfilmyapi2025.pages.dev/daily/data/2023/04-07_finalsummary.json"
        );
        assert_eq!(route.fallback, route.primary);
    }

    #[test]
    fn old_dates_after_2025_use_their_own_archive_host() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let route = provider().route(d(2026, 3, 15), now);
        assert_eq!(
            route.primary,
            "https://bfilmyapi2026.pages.dev/daily/data/2026/03-15_finalsummary.json"
        );
        assert_eq!(route.fallback, route.primary);
    }

    #[test]
    fn recent_dates_hit_live_host_with_archive_fallback() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let route = provider().route(d(2026, 5, 20), now);
        assert_eq!(
            route.primary,
            "https://bfilmyapi.pages.dev/daily/data/20260520/finalsummary.json"
        );
        assert_eq!(
            route.fallback,
            "https://bfilmyapi2026.pages.dev/daily/data/2026/05-20_finalsummary.json"
        );
    }
}
