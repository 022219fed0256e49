//! Data model for establishment setting classification.
//!
//! Everything here is plain data: identities, registry records, the
//! definition tables that drive the setting catalog, and the traceable
//! output of a classification.

#![deny(unsafe_code)]

pub mod catalog;
pub mod classification;
pub mod component;
pub mod definitions;
pub mod error;
pub mod identity;
pub mod registry;

pub use catalog::{SettingCatalog, SettingCatalogEntry};
pub use classification::{ClassificationRecord, EstablishmentTypeKey, SettingOverride};
pub use component::{
    CODE_SEPARATOR, ComponentCode, UNDETERMINABLE_CODE, UNKNOWN_CODE, compose_code,
};
pub use definitions::{
    AreaDefinition, CategoryDefinition, Definition, DefinitionKind, DesignationDefinition,
};
pub use error::{ModelError, Result};
pub use identity::{EstablishmentIdentity, normalize_text, parse_flag};
pub use registry::{EstablishmentRegistry, RegistryRecord};
