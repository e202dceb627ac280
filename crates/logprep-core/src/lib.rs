//! Core types for logprep.
//!
//! Holds the unified record schema, the in-memory [`Table`](models::Table),
//! timestamp parsing, the SSH keyword rules, IPv4 extraction, numeric
//! coercion, settings and the crate-wide error type.

pub mod data_processors;
pub mod error;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{PrepError, Result};
