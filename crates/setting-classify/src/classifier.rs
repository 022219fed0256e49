//! Per-establishment component resolution.
//!
//! Each component has its own precedence chain:
//!
//! | Component   | Order                                                       |
//! |-------------|-------------------------------------------------------------|
//! | category    | override, establishment-type table, manual, sentinel        |
//! | designation | override, designation strategy, manual, sentinel            |
//! | LA code     | override, registry, manual                                  |
//! | area        | sentinel for an empty identity, else the area strategy      |
//! | name        | override, registry (with suffixes), manual, SEN setting     |
//!
//! The manual table is a fallback for establishments the registry does not
//! know. It never replaces a registry-derived value.

use std::sync::Arc;

use tracing::{debug, trace};

use setting_model::{
    ClassificationRecord, ComponentCode, EstablishmentIdentity, EstablishmentTypeKey,
    RegistryRecord, SettingOverride, compose_code, normalize_text,
};
use setting_standards::{
    AreaStrategyKind, CatalogError, DesignationStrategyKind, SettingTables, StrategyConfig,
};

use crate::code::SettingCodeParser;
use crate::error::CodeError;
use crate::strategy::{AreaStrategy, DesignationStrategy, InAreaSplit, NeedCascade};

const SEN_UNIT_SUFFIX: &str = " (SEN Unit)";
const RESOURCED_PROVISION_SUFFIX: &str = " (Resourced Provision)";

/// Classifies identities against resolved session tables.
///
/// Holds no mutable state, so one classifier can be shared across threads.
#[derive(Clone)]
pub struct Classifier<'a> {
    tables: &'a SettingTables,
    designation_strategy: Option<Arc<dyn DesignationStrategy>>,
    area_strategy: Arc<dyn AreaStrategy>,
}

impl std::fmt::Debug for Classifier<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field(
                "designation_strategy",
                &self.designation_strategy.as_ref().map(|s| s.name()),
            )
            .field("area_strategy", &self.area_strategy.name())
            .finish_non_exhaustive()
    }
}

impl<'a> Classifier<'a> {
    /// Validate the definition tables and create a classifier with the
    /// reference strategies.
    pub fn new(tables: &'a SettingTables) -> Result<Self, CatalogError> {
        tables.validate()?;
        Ok(Self {
            tables,
            designation_strategy: Some(Arc::new(NeedCascade)),
            area_strategy: Arc::new(InAreaSplit),
        })
    }

    /// Create a classifier with the strategies named in the configuration.
    pub fn from_config(
        tables: &'a SettingTables,
        strategies: &StrategyConfig,
    ) -> Result<Self, CatalogError> {
        let classifier = match strategies.area {
            AreaStrategyKind::InArea => {
                Self::new(tables)?.with_area_strategy(Arc::new(InAreaSplit))
            }
        };
        Ok(match strategies.designation {
            DesignationStrategyKind::NeedCascade => {
                classifier.with_designation_strategy(Arc::new(NeedCascade))
            }
            DesignationStrategyKind::Disabled => classifier.without_designation_strategy(),
        })
    }

    pub fn with_designation_strategy(mut self, strategy: Arc<dyn DesignationStrategy>) -> Self {
        self.designation_strategy = Some(strategy);
        self
    }

    /// Leave designation to the override and manual tables.
    pub fn without_designation_strategy(mut self) -> Self {
        self.designation_strategy = None;
        self
    }

    pub fn with_area_strategy(mut self, strategy: Arc<dyn AreaStrategy>) -> Self {
        self.area_strategy = strategy;
        self
    }

    pub fn tables(&self) -> &'a SettingTables {
        self.tables
    }

    /// Parser over the configured area tokens and category flags.
    pub fn parser(&self) -> Result<SettingCodeParser, CodeError> {
        Ok(SettingCodeParser::new(self.tables.area_tokens())?
            .with_categories(self.tables.categories.values()))
    }

    /// Classify a batch, preserving input order.
    pub fn classify_all<'i, I>(&self, identities: I) -> Vec<ClassificationRecord>
    where
        I: IntoIterator<Item = &'i EstablishmentIdentity>,
    {
        identities
            .into_iter()
            .map(|identity| self.classify(identity))
            .collect()
    }

    pub fn classify(&self, identity: &EstablishmentIdentity) -> ClassificationRecord {
        let empty = identity.is_empty();
        let override_entry = self.tables.overrides.get(identity).cloned();
        let manual_entry = self.tables.manual.get(identity).cloned();
        let registry_record = self.tables.registry.lookup(identity).cloned();
        let establishment_type = EstablishmentTypeKey::derive(identity, registry_record.as_ref());

        let category = self.resolve_category(
            override_entry.as_ref(),
            &establishment_type,
            manual_entry.as_ref(),
            empty,
        );
        let (designate, split_area) = self
            .tables
            .categories
            .get(category.as_str())
            .map(|definition| (definition.designate, definition.split_area))
            .unwrap_or((false, false));

        let designation = designate.then(|| {
            self.resolve_designation(
                &category,
                override_entry.as_ref(),
                registry_record.as_ref(),
                manual_entry.as_ref(),
                empty,
            )
        });

        let la_code = override_entry
            .as_ref()
            .and_then(|entry| entry.la_code.clone())
            .or_else(|| registry_record.as_ref().and_then(|r| r.la_code.clone()))
            .or_else(|| manual_entry.as_ref().and_then(|entry| entry.la_code.clone()))
            .and_then(|code| normalize_text(&code));

        let area = split_area.then(|| {
            if empty && la_code.is_none() {
                ComponentCode::Unknown
            } else {
                self.area_strategy.derive(
                    &category,
                    la_code.as_deref(),
                    &self.tables.in_area_la_codes,
                )
            }
        });

        let establishment_name = establishment_name(
            identity,
            override_entry.as_ref(),
            registry_record.as_ref(),
            manual_entry.as_ref(),
        );

        let setting = compose_code([
            Some(category.as_str()),
            designation.as_ref().map(ComponentCode::as_str),
            area.as_ref().map(ComponentCode::as_str),
        ]);
        debug!(
            urn = identity.urn.as_deref().unwrap_or(""),
            ukprn = identity.ukprn.as_deref().unwrap_or(""),
            setting = %setting,
            "classified establishment"
        );

        ClassificationRecord {
            identity: identity.clone(),
            override_entry,
            manual_entry,
            registry_record,
            establishment_type,
            establishment_name,
            category,
            designation,
            area,
            designate,
            split_area,
            la_code,
            setting,
        }
    }

    fn resolve_category(
        &self,
        override_entry: Option<&SettingOverride>,
        establishment_type: &EstablishmentTypeKey,
        manual_entry: Option<&SettingOverride>,
        empty: bool,
    ) -> ComponentCode {
        if let Some(code) = override_entry.and_then(|entry| component(entry.category.as_deref())) {
            trace!(category = %code, "category from override");
            return code;
        }
        // An all-default key would match a catch-all row for any identity.
        if *establishment_type != EstablishmentTypeKey::default()
            && let Some(code) = self
                .tables
                .establishment_types
                .get(establishment_type)
                .and_then(|assignment| component(Some(&assignment.category)))
        {
            trace!(category = %code, "category from establishment type");
            return code;
        }
        if let Some(code) = manual_entry.and_then(|entry| component(entry.category.as_deref())) {
            trace!(category = %code, "category from manual table");
            return code;
        }
        trace!(empty, "category unresolved");
        sentinel(empty)
    }

    fn resolve_designation(
        &self,
        category: &ComponentCode,
        override_entry: Option<&SettingOverride>,
        registry_record: Option<&RegistryRecord>,
        manual_entry: Option<&SettingOverride>,
        empty: bool,
    ) -> ComponentCode {
        if let Some(code) = override_entry.and_then(|entry| component(entry.designation.as_deref()))
        {
            trace!(designation = %code, "designation from override");
            return code;
        }
        if let (Some(strategy), Some(record)) = (&self.designation_strategy, registry_record)
            && let Some(code) = strategy
                .derive(category, &record.sen_provision_types, record)
                .and_then(|value| ComponentCode::from_value(&value))
        {
            trace!(designation = %code, strategy = strategy.name(), "designation from strategy");
            return code;
        }
        if let Some(code) = manual_entry.and_then(|entry| component(entry.designation.as_deref())) {
            trace!(designation = %code, "designation from manual table");
            return code;
        }
        trace!(empty, "designation unresolved");
        sentinel(empty)
    }
}

fn component(value: Option<&str>) -> Option<ComponentCode> {
    value.and_then(ComponentCode::from_value)
}

fn sentinel(empty: bool) -> ComponentCode {
    if empty {
        ComponentCode::Unknown
    } else {
        ComponentCode::Undeterminable
    }
}

fn establishment_name(
    identity: &EstablishmentIdentity,
    override_entry: Option<&SettingOverride>,
    registry_record: Option<&RegistryRecord>,
    manual_entry: Option<&SettingOverride>,
) -> Option<String> {
    if let Some(name) = override_entry.and_then(|entry| entry.establishment_name.clone()) {
        return Some(name);
    }
    if let Some(name) = registry_record.and_then(|record| record.name.clone()) {
        let mut name = name;
        if identity.sen_unit_indicator {
            name.push_str(SEN_UNIT_SUFFIX);
        }
        if identity.resourced_provision_indicator {
            name.push_str(RESOURCED_PROVISION_SUFFIX);
        }
        return Some(name);
    }
    if let Some(name) = manual_entry.and_then(|entry| entry.establishment_name.clone()) {
        return Some(name);
    }
    identity
        .sen_setting
        .as_ref()
        .map(|setting| format!("(SEN Setting: {setting})"))
}

#[cfg(test)]
mod tests {
    use setting_model::CategoryDefinition;

    use super::*;

    fn category(abbreviation: &str, designate: bool, split_area: bool) -> CategoryDefinition {
        CategoryDefinition {
            abbreviation: abbreviation.to_string(),
            order: 1,
            name: abbreviation.to_string(),
            label: abbreviation.to_string(),
            definition: String::new(),
            designate,
            split_area,
        }
    }

    #[test]
    fn empty_identity_is_unknown() {
        let tables = SettingTables::default();
        let classifier = Classifier::new(&tables).unwrap();
        let record = classifier.classify(&EstablishmentIdentity::default());
        assert_eq!(record.category, ComponentCode::Unknown);
        assert_eq!(record.designation, None);
        assert_eq!(record.area, None);
        assert_eq!(record.setting, "UKN");
        assert_eq!(record.establishment_name, None);
    }

    #[test]
    fn unknown_identity_with_data_is_undeterminable() {
        let tables = SettingTables::default();
        let classifier = Classifier::new(&tables).unwrap();
        let record = classifier.classify(&EstablishmentIdentity::new().with_urn("999999"));
        assert_eq!(record.category, ComponentCode::Undeterminable);
        assert_eq!(record.setting, "XxX");
    }

    #[test]
    fn configured_unknown_category_can_be_split() {
        let mut tables = SettingTables::default();
        tables
            .categories
            .insert("UKN".to_string(), category("UKN", false, true));
        tables.areas.insert(
            "InA".to_string(),
            setting_model::AreaDefinition {
                abbreviation: "InA".to_string(),
                order: 1,
                name: "In area".to_string(),
                label: "In area".to_string(),
                definition: String::new(),
            },
        );
        let classifier = Classifier::new(&tables).unwrap();
        let record = classifier.classify(&EstablishmentIdentity::default());
        assert!(record.split_area);
        assert_eq!(record.area, Some(ComponentCode::Unknown));
        assert_eq!(record.setting, "UKN_UKN");
    }

    #[test]
    fn invalid_definitions_fail_construction() {
        let mut tables = SettingTables::default();
        tables
            .categories
            .insert("SpMdA".to_string(), category("SpMdA", true, false));
        let err = Classifier::new(&tables).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyDesignations { .. }));
    }

    #[test]
    fn from_config_installs_named_strategies() {
        let tables = SettingTables::default();
        let classifier = Classifier::from_config(&tables, &StrategyConfig::default()).unwrap();
        let debug = format!("{classifier:?}");
        assert!(debug.contains("need-cascade"), "{debug}");
        assert!(debug.contains("in-area"), "{debug}");

        let strategies = StrategyConfig {
            designation: DesignationStrategyKind::Disabled,
            area: AreaStrategyKind::InArea,
        };
        let classifier = Classifier::from_config(&tables, &strategies).unwrap();
        assert!(!format!("{classifier:?}").contains("need-cascade"));
    }

    #[test]
    fn name_falls_back_to_sen_setting() {
        let tables = SettingTables::default();
        let classifier = Classifier::new(&tables).unwrap();
        let identity = EstablishmentIdentity::new().with_sen_setting("Hospital school");
        let record = classifier.classify(&identity);
        assert_eq!(
            record.establishment_name.as_deref(),
            Some("(SEN Setting: Hospital school)")
        );
    }
}
