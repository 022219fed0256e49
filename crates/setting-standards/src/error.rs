#![deny(unsafe_code)]

use std::path::PathBuf;

use setting_model::DefinitionKind;

/// Errors raised while turning a configuration source into a lookup table.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("failed to read table {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: &'static str, column: String },

    #[error("invalid row {row} in {table} table: {message}")]
    InvalidRow {
        table: &'static str,
        row: usize,
        message: String,
    },

    #[error("dataframe error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

/// Errors raised while loading the classifier configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to resolve {table} table: {source}")]
    Table {
        table: &'static str,
        #[source]
        source: LookupError,
    },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn table(table: &'static str, source: LookupError) -> Self {
        Self::Table { table, source }
    }
}

/// Configuration errors detected before the catalog is built.
///
/// These must surface before any record is classified so that a batch is
/// never partially mis-classified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("category {category} is flagged designate but no designations are defined")]
    EmptyDesignations { category: String },

    #[error("category {category} is flagged split_area but no areas are defined")]
    EmptyAreas { category: String },

    #[error("abbreviation {abbreviation} is used by both an area and a designation")]
    AbbreviationCollision { abbreviation: String },

    #[error("duplicate {kind} abbreviation: {abbreviation}")]
    DuplicateAbbreviation {
        kind: DefinitionKind,
        abbreviation: String,
    },

    #[error("invalid {kind} abbreviation '{abbreviation}': must be non-empty and contain no '_'")]
    InvalidAbbreviation {
        kind: DefinitionKind,
        abbreviation: String,
    },
}
