use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use setting_model::{ComponentCode, SettingCatalog, UNDETERMINABLE_CODE, UNKNOWN_CODE};

use crate::types::{ClassifySummary, ParseOutcome, ValidationReport};

pub fn catalog_table(catalog: &SettingCatalog) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Order"),
        header_cell("Setting"),
        header_cell("Label"),
        header_cell("Definition"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for entry in catalog {
        table.add_row(vec![
            dim_cell(entry.order),
            Cell::new(&entry.abbreviation).add_attribute(Attribute::Bold),
            Cell::new(&entry.label),
            Cell::new(&entry.definition),
        ]);
    }
    table
}

/// Per-setting counts; written to stderr so stdout stays machine-readable.
pub fn print_classify_summary(summary: &ClassifySummary) {
    eprintln!("Input: {}", summary.input.display());
    if let Some(path) = &summary.output {
        eprintln!("Output: {}", path.display());
    }
    eprintln!("{}", classify_table(summary));
}

pub fn classify_table(summary: &ClassifySummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Setting"), header_cell("Records")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (setting, count) in &summary.settings {
        table.add_row(vec![setting_cell(setting), Cell::new(count)]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.records).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        dim_cell("unknown (UKN)"),
        count_cell(summary.unknown, Color::Yellow),
    ]);
    table.add_row(vec![
        dim_cell("undeterminable (XxX)"),
        count_cell(summary.undeterminable, Color::Red),
    ]);
    table
}

pub fn parse_table(outcomes: &[ParseOutcome]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Category"),
        header_cell("Designation"),
        header_cell("Area"),
    ]);
    apply_table_style(&mut table);
    for outcome in outcomes {
        match &outcome.result {
            Ok(parsed) => table.add_row(vec![
                Cell::new(&outcome.code).add_attribute(Attribute::Bold),
                component_cell(Some(&parsed.category)),
                component_cell(parsed.designation.as_ref()),
                component_cell(parsed.area.as_ref()),
            ]),
            Err(message) => table.add_row(vec![
                Cell::new(&outcome.code).fg(Color::Red),
                Cell::new(message).fg(Color::Red),
                dim_cell("-"),
                dim_cell("-"),
            ]),
        };
    }
    table
}

pub fn validation_table(report: &ValidationReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Table"), header_cell("Entries")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (name, count) in &report.tables {
        table.add_row(vec![Cell::new(name), count_cell(*count, Color::Reset)]);
    }
    table.add_row(vec![
        Cell::new("catalog")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(report.catalog_entries).add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn print_validation(report: &ValidationReport) {
    println!("Config: {}", report.config.display());
    println!("{}", validation_table(report));
    println!("Area tokens: {}", report.area_tokens.join(", "));
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    if table.column_count() == 4 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(12)),
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
            ColumnConstraint::UpperBoundary(Width::Percentage(50)),
        ]);
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

/// Highlight settings that contain a sentinel component.
fn setting_cell(setting: &str) -> Cell {
    let has = |sentinel: &str| setting.split('_').any(|part| part == sentinel);
    if has(UNDETERMINABLE_CODE) {
        Cell::new(setting).fg(Color::Red)
    } else if has(UNKNOWN_CODE) {
        Cell::new(setting).fg(Color::Yellow)
    } else {
        Cell::new(setting)
    }
}

fn component_cell(code: Option<&ComponentCode>) -> Cell {
    match code {
        Some(code) if code.is_sentinel() => Cell::new(code).fg(Color::Yellow),
        Some(code) => Cell::new(code),
        None => dim_cell("-"),
    }
}
