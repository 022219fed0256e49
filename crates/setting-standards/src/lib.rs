#![deny(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod lookup;
pub mod tables;

pub use crate::catalog::CatalogBuilder;
pub use crate::config::{
    AreaConfig, AreaStrategyKind, ClassifierConfig, DesignationStrategyKind, SettingSources,
    SettingTables, StrategyConfig, TableSource, TablesConfig,
};
pub use crate::error::{CatalogError, ConfigError, LookupError};
pub use crate::lookup::{Cells, Lookup, LookupRow, LookupSource, read_csv_dataset, resolve_lookup};
pub use crate::tables::{CategoryAssignment, decode_identities};
