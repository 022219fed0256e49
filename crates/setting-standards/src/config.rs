//! Classifier configuration and once-per-session table resolution.
//!
//! The configuration file is TOML. Every recognized option is a field below
//! and unknown keys are rejected, so a typo in a table name fails loudly
//! instead of silently leaving a lookup empty.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use serde::Deserialize;
use tracing::{info, warn};

use setting_model::{
    AreaDefinition, CategoryDefinition, DefinitionKind, DesignationDefinition,
    EstablishmentIdentity, EstablishmentRegistry, EstablishmentTypeKey, RegistryRecord, SettingCatalog, SettingOverride,
};

use crate::catalog::CatalogBuilder;
use crate::error::{CatalogError, ConfigError, LookupError};
use crate::lookup::{LookupRow, LookupSource, resolve_lookup};
use crate::tables::CategoryAssignment;

/// A table as written in the configuration file: a path or inline rows.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TableSource {
    /// Delimited file, relative to the configuration file.
    Path(PathBuf),
    /// Inline rows, one TOML table per row.
    Rows(Vec<BTreeMap<String, toml::Value>>),
}

impl TableSource {
    fn into_lookup_source<R: LookupRow>(
        self,
        base_dir: &Path,
    ) -> Result<LookupSource<R>, LookupError> {
        match self {
            TableSource::Path(path) => Ok(LookupSource::File(base_dir.join(path))),
            TableSource::Rows(rows) => Ok(LookupSource::Dataset(rows_to_dataframe(&rows)?)),
        }
    }
}

/// Build a text-only DataFrame from inline rows.
///
/// The column set is the union of every row's keys; missing cells are null.
pub fn rows_to_dataframe(
    rows: &[BTreeMap<String, toml::Value>],
) -> Result<DataFrame, LookupError> {
    let names: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();
    let columns: Vec<Column> = names
        .into_iter()
        .map(|name| {
            let values: Vec<Option<String>> = rows
                .iter()
                .map(|row| row.get(name).map(toml_to_text))
                .collect();
            Series::new(name.into(), values).into_column()
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}

fn toml_to_text(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => setting_common::format_numeric(*f),
        toml::Value::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TablesConfig {
    #[serde(default)]
    pub categories: Option<TableSource>,
    #[serde(default)]
    pub designations: Option<TableSource>,
    #[serde(default)]
    pub areas: Option<TableSource>,
    #[serde(default)]
    pub registry: Option<TableSource>,
    #[serde(default)]
    pub establishment_types: Option<TableSource>,
    #[serde(default)]
    pub overrides: Option<TableSource>,
    #[serde(default)]
    pub manual: Option<TableSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AreaConfig {
    /// Local-authority codes considered "in area".
    #[serde(default)]
    pub in_area_la_codes: Vec<String>,
    /// Explicit area tokens for code parsing; defaults to the area table.
    #[serde(default)]
    pub area_abbreviations: Option<Vec<String>>,
}

/// Named designation derivation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DesignationStrategyKind {
    /// Priority cascade over special-needs provision codes.
    #[default]
    NeedCascade,
    /// No derivation; designation comes from override or manual tables only.
    #[serde(rename = "none")]
    Disabled,
}

/// Named area derivation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AreaStrategyKind {
    /// In-area / out-of-area split on the configured LA codes.
    #[default]
    InArea,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrategyConfig {
    #[serde(default)]
    pub designation: DesignationStrategyKind,
    #[serde(default)]
    pub area: AreaStrategyKind,
}

/// Top-level classifier configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub tables: TablesConfig,
    #[serde(default)]
    pub area: AreaConfig,
    #[serde(default)]
    pub strategies: StrategyConfig,
    /// Directory relative table paths resolve against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl ClassifierConfig {
    /// Load a configuration file; relative table paths resolve against its
    /// directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let mut config: Self = toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Parse configuration text with an explicit base directory.
    pub fn from_toml_str(contents: &str, base_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(contents).map_err(|e| ConfigError::Toml {
            path: PathBuf::from("<inline>"),
            source: e,
        })?;
        config.base_dir = base_dir.into();
        Ok(config)
    }

    /// Turn the configured tables into lookup sources.
    pub fn sources(&self) -> Result<SettingSources, ConfigError> {
        let tables = self.tables.clone();
        let base = self.base_dir.as_path();
        Ok(SettingSources {
            categories: convert(tables.categories, base, "categories")?,
            designations: convert(tables.designations, base, "designations")?,
            areas: convert(tables.areas, base, "areas")?,
            registry: convert(tables.registry, base, "registry")?,
            establishment_types: convert(tables.establishment_types, base, "establishment_types")?,
            overrides: convert(tables.overrides, base, "overrides")?,
            manual: convert(tables.manual, base, "manual")?,
            in_area_la_codes: self.area.in_area_la_codes.iter().cloned().collect(),
            area_abbreviations: self.area.area_abbreviations.clone(),
        })
    }

    /// Resolve every table once.
    pub fn resolve(&self) -> Result<SettingTables, ConfigError> {
        self.sources()?.resolve()
    }
}

fn convert<R: LookupRow>(
    source: Option<TableSource>,
    base_dir: &Path,
    table: &'static str,
) -> Result<Option<LookupSource<R>>, ConfigError> {
    source
        .map(|source| source.into_lookup_source(base_dir))
        .transpose()
        .map_err(|e| ConfigError::table(table, e))
}

/// Unresolved lookup sources for one classification session.
#[derive(Debug, Default)]
pub struct SettingSources {
    pub categories: Option<LookupSource<CategoryDefinition>>,
    pub designations: Option<LookupSource<DesignationDefinition>>,
    pub areas: Option<LookupSource<AreaDefinition>>,
    pub registry: Option<LookupSource<RegistryRecord>>,
    pub establishment_types: Option<LookupSource<CategoryAssignment>>,
    pub overrides: Option<LookupSource<SettingOverride>>,
    pub manual: Option<LookupSource<SettingOverride>>,
    pub in_area_la_codes: BTreeSet<String>,
    pub area_abbreviations: Option<Vec<String>>,
}

impl SettingSources {
    /// Read and decode every configured table.
    pub fn resolve(self) -> Result<SettingTables, ConfigError> {
        let tables = SettingTables {
            categories: resolve_lookup(self.categories)
                .map_err(|e| ConfigError::table("categories", e))?,
            designations: resolve_lookup(self.designations)
                .map_err(|e| ConfigError::table("designations", e))?,
            areas: resolve_lookup(self.areas).map_err(|e| ConfigError::table("areas", e))?,
            registry: EstablishmentRegistry::new(
                resolve_lookup(self.registry).map_err(|e| ConfigError::table("registry", e))?,
            ),
            establishment_types: resolve_lookup(self.establishment_types)
                .map_err(|e| ConfigError::table("establishment_types", e))?,
            overrides: resolve_lookup(self.overrides)
                .map_err(|e| ConfigError::table("overrides", e))?,
            manual: resolve_lookup(self.manual).map_err(|e| ConfigError::table("manual", e))?,
            in_area_la_codes: self.in_area_la_codes,
            area_abbreviations: self.area_abbreviations,
        };
        info!(
            categories = tables.categories.len(),
            designations = tables.designations.len(),
            areas = tables.areas.len(),
            registry = tables.registry.len(),
            establishment_types = tables.establishment_types.len(),
            overrides = tables.overrides.len(),
            manual = tables.manual.len(),
            "resolved classification tables"
        );
        Ok(tables)
    }
}

/// Resolved, immutable lookup tables for a classification session.
#[derive(Debug, Clone, Default)]
pub struct SettingTables {
    pub categories: BTreeMap<String, CategoryDefinition>,
    pub designations: BTreeMap<String, DesignationDefinition>,
    pub areas: BTreeMap<String, AreaDefinition>,
    pub registry: EstablishmentRegistry,
    pub establishment_types: BTreeMap<EstablishmentTypeKey, CategoryAssignment>,
    pub overrides: BTreeMap<EstablishmentIdentity, SettingOverride>,
    pub manual: BTreeMap<EstablishmentIdentity, SettingOverride>,
    pub in_area_la_codes: BTreeSet<String>,
    pub area_abbreviations: Option<Vec<String>>,
}

impl SettingTables {
    pub fn catalog_builder(&self) -> CatalogBuilder<'_> {
        CatalogBuilder::new(
            self.categories.values(),
            self.designations.values(),
            self.areas.values(),
        )
    }

    /// Check the definition tables and the parser's area tokens for
    /// configuration errors.
    pub fn validate(&self) -> Result<(), CatalogError> {
        self.catalog_builder().validate()?;
        self.check_area_abbreviations()
    }

    pub fn build_catalog(&self) -> Result<SettingCatalog, CatalogError> {
        self.check_area_abbreviations()?;
        self.catalog_builder().build()
    }

    /// The explicit area list replaces the area table as parser tokens, so
    /// it must obey the same rules: well-formed, unique, and disjoint from
    /// the designations.
    fn check_area_abbreviations(&self) -> Result<(), CatalogError> {
        let Some(list) = &self.area_abbreviations else {
            return Ok(());
        };
        let mut seen = BTreeSet::new();
        for token in list {
            if token.trim().is_empty() || token.contains('_') {
                return Err(CatalogError::InvalidAbbreviation {
                    kind: DefinitionKind::Area,
                    abbreviation: token.clone(),
                });
            }
            if !seen.insert(token.as_str()) {
                return Err(CatalogError::DuplicateAbbreviation {
                    kind: DefinitionKind::Area,
                    abbreviation: token.clone(),
                });
            }
            if self.designations.contains_key(token) {
                warn!(abbreviation = %token, "area abbreviation collides with a designation");
                return Err(CatalogError::AbbreviationCollision {
                    abbreviation: token.clone(),
                });
            }
        }
        Ok(())
    }

    /// Area tokens for code parsing: the explicit list when configured,
    /// otherwise the area table.
    pub fn area_tokens(&self) -> Vec<String> {
        match &self.area_abbreviations {
            Some(list) => list.clone(),
            None => self.areas.keys().cloned().collect(),
        }
    }
}
