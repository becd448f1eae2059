//! Persistence of yearly documents.

pub mod store;

pub use store::*;
