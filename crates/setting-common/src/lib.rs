//! Shared utilities for the setting classification workspace.
//!
//! This crate provides the Polars DataFrame helpers used when tabular
//! configuration sources are converted into lookup tables.

pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use polars::{
    any_to_string, any_to_string_non_empty, column_names, format_numeric, parse_i64,
    string_cells,
};
