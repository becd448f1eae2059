//! `boxoffice-stats` library crate.
//!
//! Builds per-year box-office documents from daily provider snapshots: per-movie
//! daily series, running totals, and top-5 city/state/chain leaderboards.
//!
//! The binary (`boxoffice`) is a thin wrapper around this library so the
//! aggregation engine is testable without network or disk.

pub mod aggregate;
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod stats;
pub mod time;
