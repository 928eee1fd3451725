//! Shared domain types.
//!
//! This module defines:
//!
//! - the raw forecast document as returned by the source (`RawForecast`)
//! - the sky-condition vocabulary (`Condition`)
//! - derived per-day and per-city statistics (`DayStat`, `CityStat`)

pub mod types;

pub use types::*;
