//! Shared session tables for classifier tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use setting_model::{
    AreaDefinition, CategoryDefinition, DesignationDefinition, EstablishmentIdentity,
    EstablishmentRegistry, EstablishmentTypeKey, RegistryRecord, SettingOverride,
};
use setting_standards::{CategoryAssignment, SettingTables};

pub const DESIGNATIONS: &[&str] = &[
    "PMSLD", "PMLD", "SLD", "ASD", "SEMH", "MLD", "SLCN", "SENS", "GEN",
];

fn category(abbreviation: &str, order: i64, designate: bool, split_area: bool) -> CategoryDefinition {
    CategoryDefinition {
        abbreviation: abbreviation.to_string(),
        order,
        name: abbreviation.to_string(),
        label: abbreviation.to_string(),
        definition: format!("{abbreviation} settings"),
        designate,
        split_area,
    }
}

fn area(abbreviation: &str, order: i64) -> AreaDefinition {
    AreaDefinition {
        abbreviation: abbreviation.to_string(),
        order,
        name: abbreviation.to_string(),
        label: abbreviation.to_string(),
        definition: String::new(),
    }
}

fn type_key(type_of_establishment: Option<&str>, sen_unit: bool, sen_setting: Option<&str>) -> EstablishmentTypeKey {
    EstablishmentTypeKey {
        type_of_establishment: type_of_establishment.map(str::to_string),
        sen_unit_indicator: sen_unit,
        resourced_provision_indicator: false,
        sen_setting: sen_setting.map(str::to_string),
    }
}

fn assign(category: &str) -> CategoryAssignment {
    CategoryAssignment {
        category: category.to_string(),
    }
}

/// Four categories covering every flag combination, a two-record registry
/// and an in-area set of `{"675"}`.
pub fn tables() -> SettingTables {
    let mut tables = SettingTables::default();
    for definition in [
        category("MmS", 1, false, false),
        category("MmSU", 2, true, false),
        category("SpMdA", 3, true, true),
        category("IS", 4, false, true),
    ] {
        tables
            .categories
            .insert(definition.abbreviation.clone(), definition);
    }
    for (idx, code) in DESIGNATIONS.iter().enumerate() {
        tables.designations.insert(
            code.to_string(),
            DesignationDefinition {
                abbreviation: code.to_string(),
                order: idx as i64 + 1,
                name: code.to_string(),
                label: code.to_string(),
                definition: format!("{code} needs"),
            },
        );
    }
    tables.areas.insert("InA".to_string(), area("InA", 1));
    tables.areas.insert("OoA".to_string(), area("OoA", 2));

    tables.registry = EstablishmentRegistry::from_records([
        RegistryRecord {
            urn: "113644".to_string(),
            ukprn: None,
            name: Some("Oak Special School".to_string()),
            type_of_establishment: Some("Foundation special school".to_string()),
            la_code: Some("675".to_string()),
            sen_provision_types: vec!["SEMH".to_string()],
        },
        RegistryRecord {
            urn: "100001".to_string(),
            ukprn: Some("10000001".to_string()),
            name: Some("Elm Academy".to_string()),
            type_of_establishment: Some("Academy converter".to_string()),
            la_code: Some("212".to_string()),
            sen_provision_types: Vec::new(),
        },
    ]);

    tables.establishment_types = BTreeMap::from([
        (type_key(Some("Foundation special school"), false, None), assign("SpMdA")),
        (type_key(Some("Academy converter"), false, None), assign("MmS")),
        (type_key(Some("Academy converter"), true, None), assign("MmSU")),
        (type_key(None, false, Some("Independent")), assign("IS")),
    ]);
    tables.in_area_la_codes = ["675".to_string()].into();
    tables
}

pub fn manual(category: &str, designation: Option<&str>, la_code: Option<&str>) -> SettingOverride {
    SettingOverride {
        category: Some(category.to_string()),
        designation: designation.map(str::to_string),
        la_code: la_code.map(str::to_string),
        establishment_name: None,
    }
}

pub fn urn(value: &str) -> EstablishmentIdentity {
    EstablishmentIdentity::new().with_urn(value)
}
