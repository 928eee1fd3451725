//! `weather-rank` library crate.
//!
//! The binary (`wrank`) is a thin wrapper around this library so that:
//!
//! - the full pipeline is testable without spawning processes
//! - every stage can be driven with a stub forecast source in tests
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod report;
pub mod stats;
