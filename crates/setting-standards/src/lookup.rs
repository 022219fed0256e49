//! Lookup resolution.
//!
//! A lookup table can be configured three ways: as an explicit mapping, as
//! a tabular dataset, or as a delimited file. [`LookupSource`] captures that
//! choice and [`LookupSource::resolve`] normalizes it into one canonical
//! mapping. An absent source resolves to an empty mapping so downstream
//! logic never has to branch on "not configured".
//!
//! Resolution reads and decodes the whole source, which for a registry
//! export can mean a hundred thousand rows. Resolve once per session and
//! share the result; never resolve per classification call.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use tracing::{debug, warn};

use setting_common::{column_names, string_cells};

use crate::error::LookupError;

/// Grouped cells of one dataset row.
///
/// A single column yields a scalar, several columns a tuple in column order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cells {
    Scalar(Option<String>),
    Tuple(Vec<Option<String>>),
}

impl Cells {
    fn from_row(mut values: Vec<Option<String>>) -> Self {
        if values.len() == 1 {
            Self::Scalar(values.pop().flatten())
        } else {
            Self::Tuple(values)
        }
    }

    /// Cell at a position; a scalar only has position 0.
    pub fn get(&self, idx: usize) -> Option<&str> {
        match self {
            Self::Scalar(value) if idx == 0 => value.as_deref(),
            Self::Scalar(_) => None,
            Self::Tuple(values) => values.get(idx).and_then(|v| v.as_deref()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Tuple(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(value) => value.is_none(),
            Self::Tuple(values) => values.iter().all(Option::is_none),
        }
    }
}

/// A typed table row decoded from grouped dataset cells.
pub trait LookupRow: Sized {
    type Key: Ord;

    /// Table name used in error messages and logs.
    const TABLE: &'static str;
    const KEY_COLUMNS: &'static [&'static str];
    const VALUE_COLUMNS: &'static [&'static str];
    /// Columns that must be present in a dataset. Other listed columns read
    /// as blank when absent.
    const REQUIRED_COLUMNS: &'static [&'static str];

    fn from_cells(key: &Cells, value: &Cells) -> Result<(Self::Key, Self), String>;
}

/// Canonical resolved mapping for a row type.
pub type Lookup<R> = BTreeMap<<R as LookupRow>::Key, R>;

/// Where a lookup table comes from.
pub enum LookupSource<R: LookupRow> {
    /// Already keyed; used as-is.
    Mapping(Lookup<R>),
    /// Tabular data grouped on the row type's key columns.
    Dataset(DataFrame),
    /// Delimited file read into a dataset.
    File(PathBuf),
}

impl<R: LookupRow> LookupSource<R> {
    pub fn resolve(self) -> Result<Lookup<R>, LookupError> {
        match self {
            Self::Mapping(mapping) => Ok(mapping),
            Self::Dataset(df) => decode_dataset::<R>(&df),
            Self::File(path) => {
                let df = read_csv_dataset(&path)?;
                decode_dataset::<R>(&df)
            }
        }
    }
}

impl<R: LookupRow> std::fmt::Debug for LookupSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mapping(mapping) => write!(f, "Mapping({} entries)", mapping.len()),
            Self::Dataset(df) => write!(f, "Dataset({} rows)", df.height()),
            Self::File(path) => write!(f, "File({})", path.display()),
        }
    }
}

/// Resolve an optional source; absent sources give an empty mapping.
pub fn resolve_lookup<R: LookupRow>(
    source: Option<LookupSource<R>>,
) -> Result<Lookup<R>, LookupError> {
    match source {
        Some(source) => {
            let lookup = source.resolve()?;
            debug!(table = R::TABLE, entries = lookup.len(), "resolved lookup");
            Ok(lookup)
        }
        None => {
            debug!(table = R::TABLE, "lookup not configured, using empty mapping");
            Ok(BTreeMap::new())
        }
    }
}

/// Read a delimited file with every column kept as text.
///
/// Codes such as `0675` or `100000` must not be reinterpreted as numbers,
/// so schema inference is disabled.
pub fn read_csv_dataset(path: &Path) -> Result<DataFrame, LookupError> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| LookupError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| LookupError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Group a dataset on key columns into the untyped canonical mapping.
///
/// Columns missing from the dataset read as blank. When several rows share
/// a key the first one wins.
pub fn group_dataset(
    df: &DataFrame,
    key_columns: &[&str],
    value_columns: &[&str],
) -> Result<BTreeMap<Cells, Cells>, LookupError> {
    let (keys, values) = group_rows(df, key_columns, value_columns)?;
    let mut grouped = BTreeMap::new();
    for (key, value) in keys.into_iter().zip(values) {
        grouped.entry(key).or_insert(value);
    }
    Ok(grouped)
}

fn group_rows(
    df: &DataFrame,
    key_columns: &[&str],
    value_columns: &[&str],
) -> Result<(Vec<Cells>, Vec<Cells>), LookupError> {
    Ok((
        dataset_rows(df, key_columns)?,
        dataset_rows(df, value_columns)?,
    ))
}

/// Read the given columns of every row, in row order.
///
/// Columns missing from the dataset read as blank.
pub fn dataset_rows(df: &DataFrame, columns: &[&str]) -> Result<Vec<Cells>, LookupError> {
    let present = column_names(df);
    let mut cells = Vec::with_capacity(columns.len());
    for column in columns {
        if present.iter().any(|name| name == column) {
            cells.push(string_cells(df, column)?);
        } else {
            cells.push(vec![None; df.height()]);
        }
    }

    let rows = (0..df.height())
        .map(|idx| Cells::from_row(cells.iter().map(|column| column[idx].clone()).collect()))
        .collect();
    Ok(rows)
}

/// Decode a dataset into a typed lookup.
pub fn decode_dataset<R: LookupRow>(df: &DataFrame) -> Result<Lookup<R>, LookupError> {
    let present = column_names(df);
    for required in R::REQUIRED_COLUMNS {
        if !present.iter().any(|name| name == required) {
            return Err(LookupError::MissingColumn {
                table: R::TABLE,
                column: (*required).to_string(),
            });
        }
    }

    let (keys, values) = group_rows(df, R::KEY_COLUMNS, R::VALUE_COLUMNS)?;
    let mut lookup = BTreeMap::new();
    let mut duplicates = 0usize;
    for (idx, (key, value)) in keys.iter().zip(values.iter()).enumerate() {
        let (key, row) = R::from_cells(key, value).map_err(|message| LookupError::InvalidRow {
            table: R::TABLE,
            // 1-based data row, header excluded
            row: idx + 1,
            message,
        })?;
        if lookup.contains_key(&key) {
            duplicates += 1;
            continue;
        }
        lookup.insert(key, row);
    }
    if duplicates > 0 {
        warn!(
            table = R::TABLE,
            duplicates, "duplicate keys in lookup table, keeping the first row"
        );
    }
    Ok(lookup)
}
