use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use setting_classify::Classifier;
use setting_model::{ClassificationRecord, ComponentCode, SettingCatalog};
use setting_standards::{ClassifierConfig, SettingTables, decode_identities, read_csv_dataset};

use crate::cli::{CatalogArgs, CatalogFormatArg, ClassifyArgs, ConfigArgs, ParseArgs, RecordFormatArg};
use crate::output::{write_catalog_csv, write_catalog_json, write_records_csv, write_records_json};
use crate::summary::catalog_table;
use crate::types::{ClassifySummary, ParseOutcome, ValidationReport};

/// Load the configuration and resolve every table once.
pub fn load_tables(path: &Path) -> Result<(ClassifierConfig, SettingTables)> {
    let config = ClassifierConfig::load(path)
        .with_context(|| format!("load config {}", path.display()))?;
    let tables = config.resolve().context("resolve tables")?;
    Ok((config, tables))
}

pub fn build_catalog(args: &ConfigArgs) -> Result<SettingCatalog> {
    let (_, tables) = load_tables(&args.config)?;
    tables.build_catalog().context("build setting catalog")
}

pub fn run_catalog(args: &CatalogArgs) -> Result<()> {
    let catalog = build_catalog(&args.config)?;
    let stdout = io::stdout();
    match args.format {
        CatalogFormatArg::Table => println!("{}", catalog_table(&catalog)),
        CatalogFormatArg::Csv => write_catalog_csv(stdout.lock(), &catalog)?,
        CatalogFormatArg::Json => write_catalog_json(stdout.lock(), &catalog)?,
    }
    Ok(())
}

pub fn run_classify(args: &ClassifyArgs) -> Result<ClassifySummary> {
    let span = info_span!("classify", input = %args.input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let (config, tables) = load_tables(&args.config.config)?;
    let classifier = Classifier::from_config(&tables, &config.strategies)
        .context("validate setting definitions")?;

    let df = read_csv_dataset(&args.input)
        .with_context(|| format!("read input {}", args.input.display()))?;
    let identities = decode_identities(&df).context("decode identities")?;
    let records = classifier.classify_all(&identities);
    info!(
        records = records.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "classified input"
    );

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("create output {}", path.display()))?;
            write_records(BufWriter::new(file), args.format, &records)?;
        }
        None => write_records(io::stdout().lock(), args.format, &records)?,
    }

    let mut summary = ClassifySummary {
        input: args.input.clone(),
        output: args.output.clone(),
        records: records.len(),
        ..ClassifySummary::default()
    };
    for record in &records {
        *summary.settings.entry(record.setting.clone()).or_default() += 1;
        if record.category == ComponentCode::Unknown {
            summary.unknown += 1;
        }
        if is_undeterminable(record) {
            summary.undeterminable += 1;
        }
    }
    Ok(summary)
}

fn is_undeterminable(record: &ClassificationRecord) -> bool {
    [
        Some(&record.category),
        record.designation.as_ref(),
        record.area.as_ref(),
    ]
    .into_iter()
    .flatten()
    .any(|code| *code == ComponentCode::Undeterminable)
}

fn write_records<W: Write>(
    writer: W,
    format: RecordFormatArg,
    records: &[ClassificationRecord],
) -> Result<()> {
    match format {
        RecordFormatArg::Csv => write_records_csv(writer, records),
        RecordFormatArg::Json => write_records_json(writer, records),
    }
}

pub fn run_parse(args: &ParseArgs) -> Result<Vec<ParseOutcome>> {
    let (_, tables) = load_tables(&args.config.config)?;
    let classifier = Classifier::new(&tables).context("validate setting definitions")?;
    let parser = classifier.parser().context("build setting code parser")?;
    Ok(args
        .codes
        .iter()
        .map(|code| ParseOutcome {
            code: code.clone(),
            result: parser.parse(code).map_err(|e| e.to_string()),
        })
        .collect())
}

pub fn run_validate(args: &ConfigArgs) -> Result<ValidationReport> {
    let (_, tables) = load_tables(&args.config)?;
    let catalog = tables.build_catalog().context("validate setting definitions")?;
    Ok(ValidationReport {
        config: args.config.clone(),
        tables: vec![
            ("categories", tables.categories.len()),
            ("designations", tables.designations.len()),
            ("areas", tables.areas.len()),
            ("registry", tables.registry.len()),
            ("establishment_types", tables.establishment_types.len()),
            ("overrides", tables.overrides.len()),
            ("manual", tables.manual.len()),
            ("in_area_la_codes", tables.in_area_la_codes.len()),
        ],
        catalog_entries: catalog.len(),
        area_tokens: tables.area_tokens(),
    })
}
