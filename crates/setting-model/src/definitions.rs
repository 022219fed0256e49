//! Definition tables for the three classification components.
//!
//! Categories are the first-level buckets; a category flagged `designate`
//! is split by every designation and one flagged `split_area` by every area.
//! Definitions are loaded once per session and never mutated.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which definition table an abbreviation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    Category,
    Designation,
    Area,
}

impl DefinitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefinitionKind::Category => "category",
            DefinitionKind::Designation => "designation",
            DefinitionKind::Area => "area",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shared accessors over the three definition types.
pub trait Definition {
    const KIND: DefinitionKind;

    fn abbreviation(&self) -> &str;
    fn order(&self) -> i64;
    fn name(&self) -> &str;
    fn label(&self) -> &str;
    fn definition(&self) -> &str;
}

/// An establishment category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub abbreviation: String,
    pub order: i64,
    pub name: String,
    pub label: String,
    pub definition: String,
    /// Split this category's codes by designation.
    pub designate: bool,
    /// Split this category's codes by area.
    pub split_area: bool,
}

/// A designation (served special-needs group).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignationDefinition {
    pub abbreviation: String,
    pub order: i64,
    pub name: String,
    pub label: String,
    pub definition: String,
}

/// An area (placement relative to the home local authority).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaDefinition {
    pub abbreviation: String,
    pub order: i64,
    pub name: String,
    pub label: String,
    pub definition: String,
}

impl Definition for CategoryDefinition {
    const KIND: DefinitionKind = DefinitionKind::Category;

    fn abbreviation(&self) -> &str {
        &self.abbreviation
    }
    fn order(&self) -> i64 {
        self.order
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn label(&self) -> &str {
        &self.label
    }
    fn definition(&self) -> &str {
        &self.definition
    }
}

impl Definition for DesignationDefinition {
    const KIND: DefinitionKind = DefinitionKind::Designation;

    fn abbreviation(&self) -> &str {
        &self.abbreviation
    }
    fn order(&self) -> i64 {
        self.order
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn label(&self) -> &str {
        &self.label
    }
    fn definition(&self) -> &str {
        &self.definition
    }
}

impl Definition for AreaDefinition {
    const KIND: DefinitionKind = DefinitionKind::Area;

    fn abbreviation(&self) -> &str {
        &self.abbreviation
    }
    fn order(&self) -> i64 {
        self.order
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn label(&self) -> &str {
        &self.label
    }
    fn definition(&self) -> &str {
        &self.definition
    }
}
