//! Establishment registry records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::identity::EstablishmentIdentity;

/// Official attributes of an establishment, as published by the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRecord {
    pub urn: String,
    #[serde(default)]
    pub ukprn: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Raw establishment type, e.g. "Foundation special school".
    #[serde(default)]
    pub type_of_establishment: Option<String>,
    #[serde(default)]
    pub la_code: Option<String>,
    /// Special-needs provision type codes in registry order.
    #[serde(default)]
    pub sen_provision_types: Vec<String>,
}

/// Read-only registry keyed by URN.
#[derive(Debug, Clone, Default)]
pub struct EstablishmentRegistry {
    records: BTreeMap<String, RegistryRecord>,
}

impl EstablishmentRegistry {
    pub fn new(records: BTreeMap<String, RegistryRecord>) -> Self {
        Self { records }
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = RegistryRecord>,
    {
        let mut map = BTreeMap::new();
        for record in records {
            map.entry(record.urn.clone()).or_insert(record);
        }
        Self { records: map }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, urn: &str) -> Option<&RegistryRecord> {
        self.records.get(urn)
    }

    /// Find a record by UKPRN.
    ///
    /// This is a linear scan over the registry.
    pub fn find_by_ukprn(&self, ukprn: &str) -> Option<&RegistryRecord> {
        self.records
            .values()
            .find(|record| record.ukprn.as_deref() == Some(ukprn))
    }

    /// Look up the record for an identity: by URN first, then by UKPRN.
    pub fn lookup(&self, identity: &EstablishmentIdentity) -> Option<&RegistryRecord> {
        if let Some(record) = identity.urn.as_deref().and_then(|urn| self.get(urn)) {
            return Some(record);
        }
        identity
            .ukprn
            .as_deref()
            .and_then(|ukprn| self.find_by_ukprn(ukprn))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryRecord> {
        self.records.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(urn: &str, ukprn: Option<&str>) -> RegistryRecord {
        RegistryRecord {
            urn: urn.to_string(),
            ukprn: ukprn.map(str::to_string),
            ..RegistryRecord::default()
        }
    }

    #[test]
    fn lookup_prefers_urn_and_falls_back_to_ukprn() {
        let registry = EstablishmentRegistry::from_records([
            record("100", Some("9001")),
            record("200", Some("9002")),
        ]);

        let by_urn = EstablishmentIdentity::new().with_urn("100").with_ukprn("9002");
        assert_eq!(registry.lookup(&by_urn).map(|r| r.urn.as_str()), Some("100"));

        let by_ukprn = EstablishmentIdentity::new().with_ukprn("9002");
        assert_eq!(
            registry.lookup(&by_ukprn).map(|r| r.urn.as_str()),
            Some("200")
        );

        let stale_urn = EstablishmentIdentity::new().with_urn("999").with_ukprn("9001");
        assert_eq!(
            registry.lookup(&stale_urn).map(|r| r.urn.as_str()),
            Some("100")
        );

        assert!(registry.lookup(&EstablishmentIdentity::new()).is_none());
    }

    #[test]
    fn first_record_wins_for_duplicate_urn() {
        let mut first = record("100", None);
        first.name = Some("First".to_string());
        let mut second = record("100", None);
        second.name = Some("Second".to_string());
        let registry = EstablishmentRegistry::from_records([first, second]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("100").and_then(|r| r.name.as_deref()), Some("First"));
    }
}
