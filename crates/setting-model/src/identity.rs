use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Identifies an establishment or placement.
///
/// Used as the exact-match key of the override and manual tables, so two
/// identities are the same only when all five fields agree. Text fields are
/// normalized on construction: surrounding whitespace is trimmed and blank
/// values become `None`.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EstablishmentIdentity {
    /// Unique reference number (primary registry key).
    #[serde(default)]
    pub urn: Option<String>,
    /// UK provider reference number (secondary registry key).
    #[serde(default)]
    pub ukprn: Option<String>,
    #[serde(default)]
    pub sen_unit_indicator: bool,
    #[serde(default)]
    pub resourced_provision_indicator: bool,
    /// Free-text setting label for placements without a registry entry.
    #[serde(default)]
    pub sen_setting: Option<String>,
}

impl EstablishmentIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_urn(mut self, urn: impl AsRef<str>) -> Self {
        self.urn = normalize_text(urn.as_ref());
        self
    }

    pub fn with_ukprn(mut self, ukprn: impl AsRef<str>) -> Self {
        self.ukprn = normalize_text(ukprn.as_ref());
        self
    }

    pub fn with_sen_unit(mut self, enable: bool) -> Self {
        self.sen_unit_indicator = enable;
        self
    }

    pub fn with_resourced_provision(mut self, enable: bool) -> Self {
        self.resourced_provision_indicator = enable;
        self
    }

    pub fn with_sen_setting(mut self, setting: impl AsRef<str>) -> Self {
        self.sen_setting = normalize_text(setting.as_ref());
        self
    }

    /// True when every field is null, blank or false.
    ///
    /// Only such identities may classify as `UKN`.
    pub fn is_empty(&self) -> bool {
        is_blank(self.urn.as_deref())
            && is_blank(self.ukprn.as_deref())
            && !self.sen_unit_indicator
            && !self.resourced_provision_indicator
            && is_blank(self.sen_setting.as_deref())
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Trim a text value, mapping blank strings to `None`.
pub fn normalize_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a boolean flag as found in hand-authored tables.
///
/// Blank cells read as `false`.
pub fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "f" | "no" | "n" => Ok(false),
        "1" | "true" | "t" | "yes" | "y" => Ok(true),
        _ => Err(ModelError::InvalidFlag {
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_identity_is_empty() {
        assert!(EstablishmentIdentity::new().is_empty());
        assert!(EstablishmentIdentity::new().with_urn("   ").is_empty());
    }

    #[test]
    fn any_field_makes_identity_present() {
        assert!(!EstablishmentIdentity::new().with_urn("100000").is_empty());
        assert!(!EstablishmentIdentity::new().with_ukprn("10012345").is_empty());
        assert!(!EstablishmentIdentity::new().with_sen_unit(true).is_empty());
        assert!(
            !EstablishmentIdentity::new()
                .with_resourced_provision(true)
                .is_empty()
        );
        assert!(
            !EstablishmentIdentity::new()
                .with_sen_setting("Home education")
                .is_empty()
        );
    }

    #[test]
    fn parse_flag_accepts_common_spellings() {
        assert_eq!(parse_flag("Y"), Ok(true));
        assert_eq!(parse_flag(" true "), Ok(true));
        assert_eq!(parse_flag("1"), Ok(true));
        assert_eq!(parse_flag(""), Ok(false));
        assert_eq!(parse_flag("No"), Ok(false));
        assert!(parse_flag("maybe").is_err());
    }
}
