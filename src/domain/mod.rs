//! Domain types used throughout the engine.
//!
//! This module defines:
//!
//! - the persisted yearly document (`YearDocument`, `MovieRecord`, `Totals`, `LeaderRow`)
//! - the raw per-day snapshot as read from the provider (`RawDay`, `RawMovie`, ...)

pub mod snapshot;
pub mod types;

pub use snapshot::*;
pub use types::*;
