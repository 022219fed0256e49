//! Pluggable designation and area derivation.
//!
//! Both strategies are pure over their inputs. The classifier only calls the
//! designation strategy when a registry record was found; the area strategy
//! is called whenever an area is required and the identity carries data.

use std::collections::BTreeSet;

use setting_model::{ComponentCode, RegistryRecord};

/// Designation used when no provision type matches the cascade.
pub const GENERAL_DESIGNATION: &str = "GEN";

pub const IN_AREA: &str = "InA";
pub const OUT_OF_AREA: &str = "OoA";

/// Derives a designation abbreviation from registry attributes.
pub trait DesignationStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// `None` defers to the manual table.
    fn derive(
        &self,
        category: &ComponentCode,
        need_codes: &[String],
        record: &RegistryRecord,
    ) -> Option<String>;
}

/// Derives an area component from the resolved local-authority code.
pub trait AreaStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn derive(
        &self,
        category: &ComponentCode,
        la_code: Option<&str>,
        in_area: &BTreeSet<String>,
    ) -> ComponentCode;
}

/// Priority cascade over special-needs provision codes.
///
/// Profound and severe learning difficulties together map to `PMSLD`. Then
/// the first matching entry of [`NeedCascade::PRIORITY`] wins, and any
/// sensory impairment maps to `SENS`. Everything else is `GEN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeedCascade;

impl NeedCascade {
    pub const PRIORITY: &'static [&'static str] = &["PMLD", "SLD", "ASD", "SEMH", "MLD", "SLCN"];
    pub const SENSORY: &'static [&'static str] = &["HI", "VI", "MSI"];

    /// Apply the cascade to raw need codes.
    pub fn designate<S: AsRef<str>>(need_codes: &[S]) -> &'static str {
        let codes: BTreeSet<String> = need_codes
            .iter()
            .map(|code| code.as_ref().trim().to_ascii_uppercase())
            .filter(|code| !code.is_empty())
            .collect();
        let has = |code: &str| codes.contains(code);

        if has("SLD") && has("PMLD") {
            return "PMSLD";
        }
        if let Some(code) = Self::PRIORITY.iter().copied().find(|code| has(code)) {
            return code;
        }
        if Self::SENSORY.iter().any(|code| has(code)) {
            return "SENS";
        }
        GENERAL_DESIGNATION
    }
}

impl DesignationStrategy for NeedCascade {
    fn name(&self) -> &'static str {
        "need-cascade"
    }

    fn derive(
        &self,
        _category: &ComponentCode,
        need_codes: &[String],
        _record: &RegistryRecord,
    ) -> Option<String> {
        Some(Self::designate(need_codes).to_string())
    }
}

/// In-area / out-of-area split on a set of local-authority codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct InAreaSplit;

impl AreaStrategy for InAreaSplit {
    fn name(&self) -> &'static str {
        "in-area"
    }

    fn derive(
        &self,
        _category: &ComponentCode,
        la_code: Option<&str>,
        in_area: &BTreeSet<String>,
    ) -> ComponentCode {
        match la_code.map(str::trim).filter(|code| !code.is_empty()) {
            Some(code) if in_area.contains(code) => ComponentCode::Resolved(IN_AREA.to_string()),
            Some(_) => ComponentCode::Resolved(OUT_OF_AREA.to_string()),
            None => ComponentCode::Undeterminable,
        }
    }
}
