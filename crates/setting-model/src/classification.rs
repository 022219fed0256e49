//! Classification inputs keyed by identity and the traceable output record.

use serde::{Deserialize, Serialize};

use crate::component::{ComponentCode, compose_code};
use crate::identity::EstablishmentIdentity;
use crate::registry::RegistryRecord;

/// Key of the establishment-type to category table.
///
/// Combines the registry's establishment type with the identity flags, so a
/// SEN unit inside a mainstream school can map to a different category than
/// the school itself.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EstablishmentTypeKey {
    pub type_of_establishment: Option<String>,
    pub sen_unit_indicator: bool,
    pub resourced_provision_indicator: bool,
    pub sen_setting: Option<String>,
}

impl EstablishmentTypeKey {
    pub fn derive(identity: &EstablishmentIdentity, record: Option<&RegistryRecord>) -> Self {
        Self {
            type_of_establishment: record.and_then(|r| r.type_of_establishment.clone()),
            sen_unit_indicator: identity.sen_unit_indicator,
            resourced_provision_indicator: identity.resourced_provision_indicator,
            sen_setting: identity.sen_setting.clone(),
        }
    }
}

/// One row of the override or manual table.
///
/// Every field is optional; a `None` defers to the next source in the
/// precedence chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingOverride {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub la_code: Option<String>,
    #[serde(default)]
    pub establishment_name: Option<String>,
}

/// Everything the classifier looked at and decided for one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub identity: EstablishmentIdentity,
    pub override_entry: Option<SettingOverride>,
    pub manual_entry: Option<SettingOverride>,
    pub registry_record: Option<RegistryRecord>,
    pub establishment_type: EstablishmentTypeKey,
    pub establishment_name: Option<String>,
    pub category: ComponentCode,
    pub designation: Option<ComponentCode>,
    pub area: Option<ComponentCode>,
    pub designate: bool,
    pub split_area: bool,
    pub la_code: Option<String>,
    /// Composite setting code.
    pub setting: String,
}

impl ClassificationRecord {
    /// Recompute the composite code from the resolved components.
    pub fn composed_setting(&self) -> String {
        compose_code([
            Some(self.category.as_str()),
            self.designation.as_ref().map(ComponentCode::as_str),
            self.area.as_ref().map(ComponentCode::as_str),
        ])
    }

    /// True when any resolved component is a sentinel.
    pub fn has_sentinel(&self) -> bool {
        self.category.is_sentinel()
            || self.designation.as_ref().is_some_and(ComponentCode::is_sentinel)
            || self.area.as_ref().is_some_and(ComponentCode::is_sentinel)
    }
}
