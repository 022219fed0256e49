//! Record and catalog writers.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use setting_model::{ClassificationRecord, ComponentCode, SettingCatalog};

/// One flat output row per classification record.
///
/// Sentinels are written as their string codes.
#[derive(Debug, Serialize)]
pub struct RecordRow<'a> {
    pub urn: Option<&'a str>,
    pub ukprn: Option<&'a str>,
    pub sen_unit_indicator: bool,
    pub resourced_provision_indicator: bool,
    pub sen_setting: Option<&'a str>,
    pub establishment_name: Option<&'a str>,
    pub type_of_establishment: Option<&'a str>,
    pub registry_urn: Option<&'a str>,
    pub override_applied: bool,
    pub manual_applied: bool,
    pub la_code: Option<&'a str>,
    pub category: &'a str,
    pub designation: Option<&'a str>,
    pub area: Option<&'a str>,
    pub designate: bool,
    pub split_area: bool,
    pub setting: &'a str,
}

impl<'a> From<&'a ClassificationRecord> for RecordRow<'a> {
    fn from(record: &'a ClassificationRecord) -> Self {
        Self {
            urn: record.identity.urn.as_deref(),
            ukprn: record.identity.ukprn.as_deref(),
            sen_unit_indicator: record.identity.sen_unit_indicator,
            resourced_provision_indicator: record.identity.resourced_provision_indicator,
            sen_setting: record.identity.sen_setting.as_deref(),
            establishment_name: record.establishment_name.as_deref(),
            type_of_establishment: record.establishment_type.type_of_establishment.as_deref(),
            registry_urn: record.registry_record.as_ref().map(|r| r.urn.as_str()),
            override_applied: record.override_entry.is_some(),
            manual_applied: record.manual_entry.is_some(),
            la_code: record.la_code.as_deref(),
            category: record.category.as_str(),
            designation: record.designation.as_ref().map(ComponentCode::as_str),
            area: record.area.as_ref().map(ComponentCode::as_str),
            designate: record.designate,
            split_area: record.split_area,
            setting: &record.setting,
        }
    }
}

pub fn write_records_csv<W: Write>(writer: W, records: &[ClassificationRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer
            .serialize(RecordRow::from(record))
            .context("write record row")?;
    }
    writer.flush().context("flush records")?;
    Ok(())
}

/// Full records, including the override, manual and registry rows consulted.
pub fn write_records_json<W: Write>(mut writer: W, records: &[ClassificationRecord]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, records).context("serialize records")?;
    writeln!(writer).context("write records")?;
    Ok(())
}

pub fn write_catalog_csv<W: Write>(writer: W, catalog: &SettingCatalog) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for entry in catalog {
        writer.serialize(entry).context("write catalog row")?;
    }
    writer.flush().context("flush catalog")?;
    Ok(())
}

pub fn write_catalog_json<W: Write>(mut writer: W, catalog: &SettingCatalog) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, catalog.entries()).context("serialize catalog")?;
    writeln!(writer).context("write catalog")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use setting_model::SettingCatalogEntry;

    use super::*;

    #[test]
    fn catalog_csv_leaves_missing_components_blank() {
        let catalog = SettingCatalog::new(vec![
            SettingCatalogEntry {
                abbreviation: "IS_OoA".to_string(),
                order: 2,
                name: "Out of area Independent".to_string(),
                label: "Independent (Out of area)".to_string(),
                definition: "Independent schools".to_string(),
                category: "IS".to_string(),
                designation: None,
                area: Some("OoA".to_string()),
            },
            SettingCatalogEntry {
                abbreviation: "MmS".to_string(),
                order: 1,
                name: "Mainstream".to_string(),
                label: "Mainstream".to_string(),
                definition: "Mainstream schools".to_string(),
                category: "MmS".to_string(),
                designation: None,
                area: None,
            },
        ]);
        let mut buffer = Vec::new();
        write_catalog_csv(&mut buffer, &catalog).unwrap();
        assert_snapshot!(String::from_utf8(buffer).unwrap(), @r"
        abbreviation,order,name,label,definition,category,designation,area
        MmS,1,Mainstream,Mainstream,Mainstream schools,MmS,,
        IS_OoA,2,Out of area Independent,Independent (Out of area),Independent schools,IS,,OoA
        ");
    }
}
