//! Data layer for logprep.
//!
//! Reads the raw CSV inputs, normalizes each source into the unified schema,
//! aligns and merges the results, and writes everything back out as CSV.

pub mod merger;
pub mod normalizers;
pub mod pipeline;
pub mod reader;

pub use logprep_core as core;
