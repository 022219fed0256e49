//! CLI argument definitions for the setting classifier.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "setting-classifier",
    version,
    about = "Classify establishments into composite setting codes",
    long_about = "Classify establishment records into composite setting codes.\n\n\
                  Resolves category, designation and area from a registry extract,\n\
                  override and manual tables, and prints the setting catalog."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the setting catalog.
    Catalog(CatalogArgs),

    /// Classify every row of an identity CSV file.
    Classify(ClassifyArgs),

    /// Split composite setting codes into their components.
    Parse(ParseArgs),

    /// Resolve and validate the configured tables.
    Validate(ConfigArgs),
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Classifier configuration file (TOML).
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    pub config: PathBuf,
}

#[derive(Args)]
pub struct CatalogArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: CatalogFormatArg,
}

#[derive(Args)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// CSV file with identity columns (urn, ukprn, sen_unit_indicator,
    /// resourced_provision_indicator, sen_setting).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Write records to a file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[arg(long = "format", value_enum, default_value = "csv")]
    pub format: RecordFormatArg,
}

#[derive(Args)]
pub struct ParseArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Composite setting codes.
    #[arg(value_name = "CODE", required = true)]
    pub codes: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CatalogFormatArg {
    Table,
    Csv,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RecordFormatArg {
    Csv,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
