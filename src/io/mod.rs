//! Artifact output helpers.

pub mod export;

pub use export::*;
