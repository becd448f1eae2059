//! Snapshot sources.

pub mod http;
pub mod provider;

pub use http::*;
pub use provider::*;
