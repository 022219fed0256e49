use std::collections::BTreeMap;
use std::path::PathBuf;

use setting_classify::ParsedCode;

/// Outcome of a `classify` run.
#[derive(Debug, Clone, Default)]
pub struct ClassifySummary {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub records: usize,
    /// Records per composite setting code.
    pub settings: BTreeMap<String, usize>,
    /// Records whose category is `UKN`.
    pub unknown: usize,
    /// Records with at least one `XxX` component.
    pub undeterminable: usize,
}

/// One code passed to `parse`.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub code: String,
    pub result: Result<ParsedCode, String>,
}

/// Counts reported by `validate`.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub config: PathBuf,
    pub tables: Vec<(&'static str, usize)>,
    pub catalog_entries: usize,
    pub area_tokens: Vec<String>,
}
