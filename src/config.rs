//! Runtime configuration.
//!
//! Values come from the process environment, after loading a `.env` file if one
//! is present. Everything has a default, so a bare `boxoffice update` works.

use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;

use crate::error::AppError;

const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";
const DEFAULT_DELAY_MS: u64 = 300;
const DEFAULT_TIMEOUT_SECS: u64 = 25;
const DEFAULT_START_YEAR: i32 = 2023;
pub const DEFAULT_LIVE_BASE: &str = "https://bfilmyapi.pages.dev";
pub const DEFAULT_ARCHIVE_BASE: &str = "https://bfilmyapi{year}.pages.dev";

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `{year}.json` documents.
    pub data_dir: PathBuf,
    /// Civil timezone used to decide what "today" is.
    pub timezone: Tz,
    /// Pause after every fetch attempt.
    pub fetch_delay: Duration,
    pub request_timeout: Duration,
    /// First year built by `backfill` when `--from` is not given.
    pub start_year: i32,
    pub live_base: String,
    /// Archive host template; `{year}` is substituted.
    pub archive_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            timezone: chrono_tz::Asia::Kolkata,
            fetch_delay: Duration::from_millis(DEFAULT_DELAY_MS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            start_year: DEFAULT_START_YEAR,
            live_base: DEFAULT_LIVE_BASE.to_string(),
            archive_base: DEFAULT_ARCHIVE_BASE.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the environment in practice).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(dir) = lookup("BOXOFFICE_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        let tz = lookup("BOXOFFICE_TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        config.timezone = tz
            .parse::<Tz>()
            .map_err(|e| AppError::local(format!("Invalid BOXOFFICE_TIMEZONE '{tz}': {e}")))?;

        if let Some(ms) = lookup("BOXOFFICE_FETCH_DELAY_MS") {
            config.fetch_delay = Duration::from_millis(parse_var("BOXOFFICE_FETCH_DELAY_MS", &ms)?);
        }
        if let Some(secs) = lookup("BOXOFFICE_TIMEOUT_SECS") {
            let secs: u64 = parse_var("BOXOFFICE_TIMEOUT_SECS", &secs)?;
            if secs == 0 {
                return Err(AppError::local("BOXOFFICE_TIMEOUT_SECS must be > 0."));
            }
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(year) = lookup("BOXOFFICE_START_YEAR") {
            config.start_year = parse_var("BOXOFFICE_START_YEAR", &year)?;
        }
        if let Some(base) = lookup("BOXOFFICE_LIVE_BASE") {
            config.live_base = base.trim_end_matches('/').to_string();
        }
        if let Some(base) = lookup("BOXOFFICE_ARCHIVE_BASE") {
            if !base.contains("{year}") {
                return Err(AppError::local(
                    "BOXOFFICE_ARCHIVE_BASE must contain a '{year}' placeholder.",
                ));
            }
            config.archive_base = base.trim_end_matches('/').to_string();
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| AppError::local(format!("Invalid {name} '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert_eq!(config.timezone, chrono_tz::Asia::Kolkata);
        assert_eq!(config.fetch_delay, Duration::from_millis(300));
        assert_eq!(config.request_timeout, Duration::from_secs(25));
        assert_eq!(config.start_year, 2023);
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_lookup(lookup(&[
            ("BOXOFFICE_DATA_DIR", "/tmp/bo"),
            ("BOXOFFICE_TIMEZONE", "UTC"),
            ("BOXOFFICE_FETCH_DELAY_MS", "0"),
            ("BOXOFFICE_START_YEAR", "2024"),
            ("BOXOFFICE_LIVE_BASE", "http://localhost:8080/"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/bo"));
        assert_eq!(config.timezone, chrono_tz::UTC);
        assert!(config.fetch_delay.is_zero());
        assert_eq!(config.start_year, 2024);
        assert_eq!(config.live_base, "http://localhost:8080");
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let err = Config::from_lookup(lookup(&[("BOXOFFICE_TIMEZONE", "Mars/Olympus")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = Config::from_lookup(lookup(&[("BOXOFFICE_FETCH_DELAY_MS", "soon")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = Config::from_lookup(lookup(&[("BOXOFFICE_ARCHIVE_BASE", "http://x")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
