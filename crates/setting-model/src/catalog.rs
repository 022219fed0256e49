use serde::{Deserialize, Serialize};

/// One enumerable setting code with its display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingCatalogEntry {
    /// Composite code, `category[_designation][_area]`.
    pub abbreviation: String,
    /// Dense 1-based position in the catalog.
    pub order: usize,
    pub name: String,
    pub label: String,
    pub definition: String,
    pub category: String,
    pub designation: Option<String>,
    pub area: Option<String>,
}

/// The full setting catalog, sorted by `order`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingCatalog {
    entries: Vec<SettingCatalogEntry>,
}

impl SettingCatalog {
    /// Wrap entries, re-sorting by `order`.
    pub fn new(mut entries: Vec<SettingCatalogEntry>) -> Self {
        entries.sort_by_key(|entry| entry.order);
        Self { entries }
    }

    pub fn entries(&self) -> &[SettingCatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SettingCatalogEntry> {
        self.entries.iter()
    }

    pub fn get(&self, abbreviation: &str) -> Option<&SettingCatalogEntry> {
        self.entries
            .iter()
            .find(|entry| entry.abbreviation == abbreviation)
    }

    pub fn contains(&self, abbreviation: &str) -> bool {
        self.get(abbreviation).is_some()
    }

    pub fn abbreviations(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.abbreviation.as_str())
            .collect()
    }
}

impl<'a> IntoIterator for &'a SettingCatalog {
    type Item = &'a SettingCatalogEntry;
    type IntoIter = std::slice::Iter<'a, SettingCatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
