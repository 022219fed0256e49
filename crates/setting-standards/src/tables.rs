//! Typed rows for every classification lookup table.
//!
//! Column names are lower snake case. Identity-keyed tables (overrides,
//! manual) may omit any identity column: a missing flag column reads as
//! `false` and a missing text column as blank, which keeps small
//! hand-authored tables short.

use polars::prelude::DataFrame;

use setting_model::{
    AreaDefinition, CategoryDefinition, DesignationDefinition, EstablishmentIdentity,
    EstablishmentTypeKey, RegistryRecord, SettingOverride, parse_flag,
};

use crate::error::LookupError;
use crate::lookup::{Cells, LookupRow, dataset_rows};

/// Separators accepted in the registry's provision-type column.
const PROVISION_SEPARATORS: &[char] = &[';', '|', ','];

const IDENTITY_COLUMNS: &[&str] = &[
    "urn",
    "ukprn",
    "sen_unit_indicator",
    "resourced_provision_indicator",
    "sen_setting",
];

const DEFINITION_VALUE_COLUMNS: &[&str] = &["order", "name", "label", "definition"];

fn text(cells: &Cells, idx: usize) -> Option<String> {
    cells.get(idx).map(str::to_string)
}

fn required(cells: &Cells, idx: usize, column: &str) -> Result<String, String> {
    text(cells, idx).ok_or_else(|| format!("missing value for '{column}'"))
}

/// A category or designation value; `_` would split the composite code.
fn component(cells: &Cells, idx: usize, column: &str) -> Result<Option<String>, String> {
    match text(cells, idx) {
        Some(value) if value.contains('_') => {
            Err(format!("{column} '{value}' must not contain '_'"))
        }
        other => Ok(other),
    }
}

fn flag(cells: &Cells, idx: usize) -> Result<bool, String> {
    parse_flag(cells.get(idx).unwrap_or("")).map_err(|e| e.to_string())
}

fn order(cells: &Cells, idx: usize, abbreviation: &str) -> Result<i64, String> {
    let raw = required(cells, idx, "order")?;
    setting_common::parse_i64(&raw).ok_or_else(|| {
        setting_model::ModelError::InvalidOrder {
            abbreviation: abbreviation.to_string(),
            value: raw,
        }
        .to_string()
    })
}

/// Shared decoding for the three definition tables. Label falls back to the
/// name when blank.
fn definition_parts(
    key: &Cells,
    value: &Cells,
) -> Result<(String, i64, String, String, String), String> {
    let abbreviation = required(key, 0, "abbreviation")?;
    let order = order(value, 0, &abbreviation)?;
    let name = text(value, 1).unwrap_or_else(|| abbreviation.clone());
    let label = text(value, 2).unwrap_or_else(|| name.clone());
    let definition = text(value, 3).unwrap_or_default();
    Ok((abbreviation, order, name, label, definition))
}

impl LookupRow for CategoryDefinition {
    type Key = String;

    const TABLE: &'static str = "categories";
    const KEY_COLUMNS: &'static [&'static str] = &["abbreviation"];
    const VALUE_COLUMNS: &'static [&'static str] = &[
        "order",
        "name",
        "label",
        "definition",
        "designate",
        "split_area",
    ];
    const REQUIRED_COLUMNS: &'static [&'static str] = &["abbreviation", "order"];

    fn from_cells(key: &Cells, value: &Cells) -> Result<(Self::Key, Self), String> {
        let (abbreviation, order, name, label, definition) = definition_parts(key, value)?;
        let row = CategoryDefinition {
            abbreviation: abbreviation.clone(),
            order,
            name,
            label,
            definition,
            designate: flag(value, 4)?,
            split_area: flag(value, 5)?,
        };
        Ok((abbreviation, row))
    }
}

impl LookupRow for DesignationDefinition {
    type Key = String;

    const TABLE: &'static str = "designations";
    const KEY_COLUMNS: &'static [&'static str] = &["abbreviation"];
    const VALUE_COLUMNS: &'static [&'static str] = DEFINITION_VALUE_COLUMNS;
    const REQUIRED_COLUMNS: &'static [&'static str] = &["abbreviation", "order"];

    fn from_cells(key: &Cells, value: &Cells) -> Result<(Self::Key, Self), String> {
        let (abbreviation, order, name, label, definition) = definition_parts(key, value)?;
        let row = DesignationDefinition {
            abbreviation: abbreviation.clone(),
            order,
            name,
            label,
            definition,
        };
        Ok((abbreviation, row))
    }
}

impl LookupRow for AreaDefinition {
    type Key = String;

    const TABLE: &'static str = "areas";
    const KEY_COLUMNS: &'static [&'static str] = &["abbreviation"];
    const VALUE_COLUMNS: &'static [&'static str] = DEFINITION_VALUE_COLUMNS;
    const REQUIRED_COLUMNS: &'static [&'static str] = &["abbreviation", "order"];

    fn from_cells(key: &Cells, value: &Cells) -> Result<(Self::Key, Self), String> {
        let (abbreviation, order, name, label, definition) = definition_parts(key, value)?;
        let row = AreaDefinition {
            abbreviation: abbreviation.clone(),
            order,
            name,
            label,
            definition,
        };
        Ok((abbreviation, row))
    }
}

impl LookupRow for RegistryRecord {
    type Key = String;

    const TABLE: &'static str = "registry";
    const KEY_COLUMNS: &'static [&'static str] = &["urn"];
    const VALUE_COLUMNS: &'static [&'static str] = &[
        "ukprn",
        "name",
        "type_of_establishment",
        "la_code",
        "sen_provision_types",
    ];
    const REQUIRED_COLUMNS: &'static [&'static str] = &["urn", "type_of_establishment"];

    fn from_cells(key: &Cells, value: &Cells) -> Result<(Self::Key, Self), String> {
        let urn = required(key, 0, "urn")?;
        let sen_provision_types = value
            .get(4)
            .map(|raw| {
                raw.split(PROVISION_SEPARATORS)
                    .map(str::trim)
                    .filter(|code| !code.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let record = RegistryRecord {
            urn: urn.clone(),
            ukprn: text(value, 0),
            name: text(value, 1),
            type_of_establishment: text(value, 2),
            la_code: text(value, 3),
            sen_provision_types,
        };
        Ok((urn, record))
    }
}

/// Category assigned to an establishment-type key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryAssignment {
    pub category: String,
}

impl LookupRow for CategoryAssignment {
    type Key = EstablishmentTypeKey;

    const TABLE: &'static str = "establishment_types";
    const KEY_COLUMNS: &'static [&'static str] = &[
        "type_of_establishment",
        "sen_unit_indicator",
        "resourced_provision_indicator",
        "sen_setting",
    ];
    const VALUE_COLUMNS: &'static [&'static str] = &["category"];
    const REQUIRED_COLUMNS: &'static [&'static str] = &["category"];

    fn from_cells(key: &Cells, value: &Cells) -> Result<(Self::Key, Self), String> {
        let type_key = EstablishmentTypeKey {
            type_of_establishment: text(key, 0),
            sen_unit_indicator: flag(key, 1)?,
            resourced_provision_indicator: flag(key, 2)?,
            sen_setting: text(key, 3),
        };
        let category = component(value, 0, "category")?
            .ok_or_else(|| "missing value for 'category'".to_string())?;
        Ok((type_key, CategoryAssignment { category }))
    }
}

fn identity_from_cells(key: &Cells) -> Result<EstablishmentIdentity, String> {
    Ok(EstablishmentIdentity {
        urn: text(key, 0),
        ukprn: text(key, 1),
        sen_unit_indicator: flag(key, 2)?,
        resourced_provision_indicator: flag(key, 3)?,
        sen_setting: text(key, 4),
    })
}

impl LookupRow for SettingOverride {
    type Key = EstablishmentIdentity;

    const TABLE: &'static str = "overrides";
    const KEY_COLUMNS: &'static [&'static str] = IDENTITY_COLUMNS;
    const VALUE_COLUMNS: &'static [&'static str] =
        &["category", "designation", "la_code", "establishment_name"];
    const REQUIRED_COLUMNS: &'static [&'static str] = &[];

    fn from_cells(key: &Cells, value: &Cells) -> Result<(Self::Key, Self), String> {
        let identity = identity_from_cells(key)?;
        let entry = SettingOverride {
            category: component(value, 0, "category")?,
            designation: component(value, 1, "designation")?,
            la_code: text(value, 2),
            establishment_name: text(value, 3),
        };
        Ok((identity, entry))
    }
}

/// Decode classification input rows into identities, preserving row order.
///
/// Unlike lookup tables, duplicate identities are kept: each input row is
/// classified on its own.
pub fn decode_identities(df: &DataFrame) -> Result<Vec<EstablishmentIdentity>, LookupError> {
    dataset_rows(df, IDENTITY_COLUMNS)?
        .iter()
        .enumerate()
        .map(|(idx, cells)| {
            identity_from_cells(cells).map_err(|message| LookupError::InvalidRow {
                table: "identities",
                row: idx + 1,
                message,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use polars::prelude::{Column, IntoColumn, NamedFrom, Series};

    use super::*;
    use crate::lookup::decode_dataset;

    fn frame(columns: Vec<(&str, Vec<&str>)>) -> DataFrame {
        let cols: Vec<Column> = columns
            .into_iter()
            .map(|(name, values)| {
                Series::new(
                    name.into(),
                    values.iter().copied().map(String::from).collect::<Vec<_>>(),
                )
                .into_column()
            })
            .collect();
        DataFrame::new(cols).unwrap()
    }

    #[test]
    fn decodes_categories_with_flags() {
        let df = frame(vec![
            ("abbreviation", vec!["SpMdA", "MmS"]),
            ("order", vec!["2", "1"]),
            ("name", vec!["Maintained special", "Mainstream"]),
            ("label", vec!["", "Mainstream school"]),
            ("definition", vec!["special schools", "mainstream schools"]),
            ("designate", vec!["Y", "N"]),
            ("split_area", vec!["true", ""]),
        ]);
        let categories = decode_dataset::<CategoryDefinition>(&df).unwrap();
        let special = &categories["SpMdA"];
        assert_eq!(special.order, 2);
        assert_eq!(special.label, "Maintained special");
        assert!(special.designate);
        assert!(special.split_area);
        assert!(!categories["MmS"].designate);
    }

    #[test]
    fn category_without_order_column_is_rejected() {
        let df = frame(vec![("abbreviation", vec!["MmS"])]);
        let err = decode_dataset::<CategoryDefinition>(&df).unwrap_err();
        assert!(matches!(err, LookupError::MissingColumn { column, .. } if column == "order"));
    }

    #[test]
    fn invalid_order_reports_row() {
        let df = frame(vec![("abbreviation", vec!["MmS"]), ("order", vec!["first"])]);
        let err = decode_dataset::<CategoryDefinition>(&df).unwrap_err();
        assert!(matches!(err, LookupError::InvalidRow { row: 1, .. }));
    }

    #[test]
    fn registry_splits_provision_types() {
        let df = frame(vec![
            ("urn", vec!["113644"]),
            ("name", vec!["Oak Special School"]),
            ("type_of_establishment", vec!["Foundation special school"]),
            ("la_code", vec!["675"]),
            ("sen_provision_types", vec!["ASD; SEMH|MLD"]),
        ]);
        let registry = decode_dataset::<RegistryRecord>(&df).unwrap();
        let record = &registry["113644"];
        assert_eq!(record.sen_provision_types, vec!["ASD", "SEMH", "MLD"]);
        assert_eq!(record.ukprn, None);
    }

    #[test]
    fn override_keys_default_missing_identity_columns() {
        let df = frame(vec![("urn", vec!["100"]), ("category", vec!["SpMdA"])]);
        let overrides = decode_dataset::<SettingOverride>(&df).unwrap();
        let key = EstablishmentIdentity::new().with_urn("100");
        assert_eq!(overrides[&key].category.as_deref(), Some("SpMdA"));
    }

    #[test]
    fn override_components_reject_underscores() {
        let df = frame(vec![("urn", vec!["100"]), ("designation", vec!["SEMH_ASD"])]);
        let err = decode_dataset::<SettingOverride>(&df).unwrap_err();
        assert!(
            matches!(err, LookupError::InvalidRow { row: 1, ref message, .. } if message.contains("SEMH_ASD"))
        );

        let df = frame(vec![
            ("type_of_establishment", vec!["Academy converter"]),
            ("category", vec!["Mm_S"]),
        ]);
        let err = decode_dataset::<CategoryAssignment>(&df).unwrap_err();
        assert!(matches!(err, LookupError::InvalidRow { .. }));
    }

    #[test]
    fn identities_keep_order_and_duplicates() {
        let df = frame(vec![
            ("urn", vec!["200", "100", "200"]),
            ("sen_unit_indicator", vec!["", "Y", ""]),
        ]);
        let identities = decode_identities(&df).unwrap();
        assert_eq!(identities.len(), 3);
        assert_eq!(identities[0].urn.as_deref(), Some("200"));
        assert!(identities[1].sen_unit_indicator);
        assert_eq!(identities[2], identities[0]);
    }
}
