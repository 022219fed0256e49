//! Loading a configuration file with file-backed tables.

use std::fs;

use setting_model::{EstablishmentIdentity, EstablishmentTypeKey};
use setting_standards::{ClassifierConfig, ConfigError, LookupError};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) {
    fs::write(dir.path().join(name), contents).unwrap();
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "categories.csv",
        "abbreviation,order,name,label,definition,designate,split_area\n\
         MmS,1,Mainstream school,Mainstream,Mainstream schools,N,N\n\
         SpMdA,2,Special school,Special,Maintained special schools,Y,Y\n",
    );
    write(
        &dir,
        "designations.csv",
        "abbreviation,order,name\nSEMH,1,Social emotional and mental health\nGEN,2,General\n",
    );
    write(&dir, "areas.csv", "abbreviation,order,name\nInA,1,In area\nOoA,2,Out of area\n");
    write(
        &dir,
        "registry.csv",
        "urn,ukprn,name,type_of_establishment,la_code,sen_provision_types\n\
         113644,10012345,Oak School,Foundation special school,0675,SEMH\n",
    );
    write(
        &dir,
        "types.csv",
        "type_of_establishment,sen_unit_indicator,resourced_provision_indicator,sen_setting,category\n\
         Foundation special school,N,N,,SpMdA\n",
    );
    write(
        &dir,
        "manual.csv",
        "ukprn,la_code,category\n10099999,675,MmS\n",
    );
    write(
        &dir,
        "classifier.toml",
        r#"
[tables]
categories = "categories.csv"
designations = "designations.csv"
areas = "areas.csv"
registry = "registry.csv"
establishment_types = "types.csv"
manual = "manual.csv"

[area]
in_area_la_codes = ["0675"]
"#,
    );
    dir
}

#[test]
fn loads_relative_tables_and_builds_catalog() {
    let dir = fixture();
    let config = ClassifierConfig::load(&dir.path().join("classifier.toml")).unwrap();
    let tables = config.resolve().unwrap();

    assert_eq!(tables.categories.len(), 2);
    assert_eq!(tables.registry.len(), 1);
    // leading zeros survive: every cell is read as text
    let record = tables.registry.get("113644").unwrap();
    assert_eq!(record.la_code.as_deref(), Some("0675"));

    let key = EstablishmentTypeKey {
        type_of_establishment: Some("Foundation special school".to_string()),
        ..EstablishmentTypeKey::default()
    };
    assert_eq!(tables.establishment_types[&key].category, "SpMdA");

    let manual_key = EstablishmentIdentity::new().with_ukprn("10099999");
    assert_eq!(tables.manual[&manual_key].la_code.as_deref(), Some("675"));

    let catalog = tables.build_catalog().unwrap();
    assert_eq!(catalog.len(), 1 + 2 * 2);
    assert_eq!(tables.area_tokens(), vec!["InA", "OoA"]);
}

#[test]
fn missing_table_file_names_the_table() {
    let dir = TempDir::new().unwrap();
    write(&dir, "classifier.toml", "[tables]\nregistry = \"absent.csv\"\n");
    let config = ClassifierConfig::load(&dir.path().join("classifier.toml")).unwrap();
    let err = config.resolve().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Table {
            table: "registry",
            source: LookupError::Read { .. }
        }
    ));
}

#[test]
fn missing_config_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = ClassifierConfig::load(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
