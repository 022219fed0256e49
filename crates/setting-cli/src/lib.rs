//! CLI library components for the setting classifier.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;
pub mod summary;
pub mod types;
