//! Setting catalog construction.
//!
//! The catalog enumerates every setting code the configuration can produce:
//! each category, crossed with every designation when it is flagged
//! `designate` and with every area when it is flagged `split_area`. Entries
//! are sorted by (category order, designation order, area order) and then
//! re-sequenced into a dense 1-based `order` used for report axes.
//!
//! Building validates the definitions first. A flagged category with an
//! empty designation or area table would otherwise vanish from the catalog
//! without a trace.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use setting_model::{
    AreaDefinition, CategoryDefinition, Definition, DesignationDefinition, SettingCatalog,
    SettingCatalogEntry, compose_code,
};

use crate::error::CatalogError;

/// Builds a [`SettingCatalog`] from borrowed definitions.
#[derive(Debug, Clone)]
pub struct CatalogBuilder<'a> {
    categories: Vec<&'a CategoryDefinition>,
    designations: Vec<&'a DesignationDefinition>,
    areas: Vec<&'a AreaDefinition>,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(
        categories: impl IntoIterator<Item = &'a CategoryDefinition>,
        designations: impl IntoIterator<Item = &'a DesignationDefinition>,
        areas: impl IntoIterator<Item = &'a AreaDefinition>,
    ) -> Self {
        Self {
            categories: sorted(categories),
            designations: sorted(designations),
            areas: sorted(areas),
        }
    }

    /// Check the definitions for configuration errors.
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        check_abbreviations(&self.categories)?;
        check_abbreviations(&self.designations)?;
        check_abbreviations(&self.areas)?;

        let designation_set: BTreeSet<&str> = self
            .designations
            .iter()
            .map(|d| d.abbreviation.as_str())
            .collect();
        for area in &self.areas {
            if designation_set.contains(area.abbreviation.as_str()) {
                return Err(CatalogError::AbbreviationCollision {
                    abbreviation: area.abbreviation.clone(),
                });
            }
        }

        for category in &self.categories {
            if category.designate && self.designations.is_empty() {
                warn!(category = %category.abbreviation, "designate category without designations");
                return Err(CatalogError::EmptyDesignations {
                    category: category.abbreviation.clone(),
                });
            }
            if category.split_area && self.areas.is_empty() {
                warn!(category = %category.abbreviation, "split_area category without areas");
                return Err(CatalogError::EmptyAreas {
                    category: category.abbreviation.clone(),
                });
            }
        }
        Ok(())
    }

    /// Validate and expand the definitions into the catalog.
    pub fn build(&self) -> Result<SettingCatalog, CatalogError> {
        self.validate()?;

        let mut entries = Vec::new();
        for category in &self.categories {
            let designations: Vec<Option<&DesignationDefinition>> = if category.designate {
                self.designations.iter().copied().map(Some).collect()
            } else {
                vec![None]
            };
            let areas: Vec<Option<&AreaDefinition>> = if category.split_area {
                self.areas.iter().copied().map(Some).collect()
            } else {
                vec![None]
            };
            // Definitions are pre-sorted, so nesting the loops yields
            // (category, designation, area) order directly.
            for designation in &designations {
                for area in &areas {
                    entries.push(compose_entry(category, *designation, *area, entries.len() + 1));
                }
            }
        }
        debug!(entries = entries.len(), "built setting catalog");
        Ok(SettingCatalog::new(entries))
    }
}

fn sorted<'a, T: Definition + 'a>(items: impl IntoIterator<Item = &'a T>) -> Vec<&'a T> {
    let mut items: Vec<&T> = items.into_iter().collect();
    items.sort_by(|a, b| {
        a.order()
            .cmp(&b.order())
            .then_with(|| a.abbreviation().cmp(b.abbreviation()))
    });
    items
}

fn check_abbreviations<T: Definition>(items: &[&T]) -> Result<(), CatalogError> {
    let mut seen = BTreeSet::new();
    for item in items {
        let abbreviation = item.abbreviation();
        if abbreviation.trim().is_empty() || abbreviation.contains('_') {
            return Err(CatalogError::InvalidAbbreviation {
                kind: T::KIND,
                abbreviation: abbreviation.to_string(),
            });
        }
        if !seen.insert(abbreviation) {
            return Err(CatalogError::DuplicateAbbreviation {
                kind: T::KIND,
                abbreviation: abbreviation.to_string(),
            });
        }
    }
    Ok(())
}

fn compose_entry(
    category: &CategoryDefinition,
    designation: Option<&DesignationDefinition>,
    area: Option<&AreaDefinition>,
    order: usize,
) -> SettingCatalogEntry {
    let abbreviation = compose_code([
        Some(category.abbreviation.as_str()),
        designation.map(|d| d.abbreviation.as_str()),
        area.map(|a| a.abbreviation.as_str()),
    ]);

    let name = [
        area.map(|a| a.name.as_str()),
        Some(category.name.as_str()),
        designation.map(|d| d.name.as_str()),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

    let mut label = category.label.clone();
    if let Some(area) = area {
        label.push_str(&format!(" ({})", area.label));
    }
    if let Some(designation) = designation {
        label.push_str(&format!(" - {}", designation.label));
    }

    let mut definition = String::new();
    if let Some(area) = area.filter(|a| !a.definition.is_empty()) {
        definition.push_str(&area.definition);
        definition.push(' ');
    }
    definition.push_str(&category.definition);
    if let Some(designation) = designation {
        definition.push_str("; providing for ");
        definition.push_str(&designation.definition);
    }

    SettingCatalogEntry {
        abbreviation,
        order,
        name,
        label,
        definition,
        category: category.abbreviation.clone(),
        designation: designation.map(|d| d.abbreviation.clone()),
        area: area.map(|a| a.abbreviation.clone()),
    }
}
