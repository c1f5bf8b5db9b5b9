//! Terminal and TSV rendering of command reports.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::cli::OutputFormatArg;

/// Tabular command output.
pub trait Report {
    /// One-line summary printed above the table.
    fn title(&self) -> String;
    fn header(&self) -> Vec<&'static str>;
    fn records(&self) -> Vec<Vec<String>>;
}

pub fn render<R: Report>(report: &R, format: OutputFormatArg) -> String {
    match format {
        OutputFormatArg::Table => format!("{}\n{}", report.title(), build_table(report)),
        OutputFormatArg::Tsv => render_tsv(report),
    }
}

pub fn build_table<R: Report>(report: &R) -> Table {
    let mut table = Table::new();
    table.set_header(
        report
            .header()
            .into_iter()
            .map(header_cell)
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for record in report.records() {
        table.add_row(record.into_iter().map(value_cell).collect::<Vec<_>>());
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn value_cell(value: String) -> Cell {
    if value.is_empty() {
        Cell::new("-").fg(Color::DarkGrey)
    } else {
        Cell::new(value)
    }
}

/// Header line then one line per record. Tabs and newlines inside values are
/// replaced by spaces.
pub fn render_tsv<R: Report>(report: &R) -> String {
    let mut out = report.header().join("\t");
    for record in report.records() {
        out.push('\n');
        let fields: Vec<String> = record
            .iter()
            .map(|field| field.replace(['\t', '\n', '\r'], " "))
            .collect();
        out.push_str(&fields.join("\t"));
    }
    out
}
