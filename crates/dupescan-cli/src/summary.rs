use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dupescan_cli::pipeline::ScanSummary;
use dupescan_model::{ColumnSpec, DatasetDescription};

pub fn print_summary(summary: &ScanSummary) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Scan"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Records"), Cell::new(summary.records)]);
    table.add_row(vec![
        Cell::new("Pairs evaluated"),
        Cell::new(summary.pairs_evaluated),
    ]);
    table.add_row(vec![
        Cell::new("Pairs emitted"),
        emitted_cell(summary.pairs_emitted),
    ]);
    table.add_row(vec![
        Cell::new("Threads"),
        if summary.threads == 0 {
            dim_cell("sequential")
        } else {
            Cell::new(summary.threads)
        },
    ]);
    table.add_row(vec![
        Cell::new("Output"),
        Cell::new(format!(
            "{} ({})",
            summary.output.display(),
            summary.format
        )),
    ]);
    table.add_row(vec![
        Cell::new("Duration"),
        Cell::new(format!("{:.2?}", summary.duration)),
    ]);
    println!("{table}");
}

pub fn print_description(description: &DatasetDescription) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Role"),
        header_cell("Weight"),
        header_cell("Case"),
        header_cell("Diacritics"),
        header_cell("Shown"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for column in description {
        table.add_row(vec![
            Cell::new(column.name()).add_attribute(Attribute::Bold),
            role_cell(column),
            if column.is_identifier() {
                dim_cell("-")
            } else {
                Cell::new(format!("{:.2}", column.weight()))
            },
            flag_cell(column.match_case(), "exact", "folded"),
            flag_cell(column.ignore_diacritics(), "stripped", "kept"),
            flag_cell(column.is_shown(), "yes", "no"),
            match column.description() {
                Some(text) => Cell::new(text),
                None => dim_cell("-"),
            },
        ]);
    }
    println!("{table}");
    println!(
        "{} columns, {} compared, {} identifiers",
        description.len(),
        description.scored_count(),
        description.identifier_count()
    );
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn role_cell(column: &ColumnSpec) -> Cell {
    if column.is_identifier() {
        Cell::new("identifier").fg(Color::Cyan)
    } else if column.is_scored() {
        Cell::new("compared").fg(Color::Green)
    } else {
        dim_cell("ignored")
    }
}

fn emitted_cell(count: u64) -> Cell {
    if count > 0 {
        Cell::new(count)
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn flag_cell(enabled: bool, on: &str, off: &str) -> Cell {
    if enabled {
        Cell::new(on)
    } else {
        dim_cell(off)
    }
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
