//! Markdown table rendering.

use crate::model::Table;

/// Narrowest column, so the separator row is always valid Markdown.
const MIN_COLUMN_WIDTH: usize = 3;

/// Render a table as an aligned Markdown grid.
///
/// The first row is the header. Ragged rows are padded on the right with
/// empty cells. Returns an empty string when the table has no rows or the
/// header row is empty.
pub fn render_table(table: &Table) -> String {
    let Some(header) = table.header() else {
        return String::new();
    };
    if header.is_empty() {
        return String::new();
    }

    let column_count = table.column_count();
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = row.iter().map(|c| clean_cell(c.as_deref())).collect();
            cells.resize(column_count, String::new());
            cells
        })
        .collect();

    let mut widths = vec![MIN_COLUMN_WIDTH; column_count];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format_row(&rows[0], &widths));
    let separator: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    lines.push(format!("| {} |", separator.join(" | ")));
    for row in &rows[1..] {
        lines.push(format_row(row, &widths));
    }

    lines.join("\n")
}

fn clean_cell(value: Option<&str>) -> String {
    match value {
        Some(text) => text.replace('\n', " ").replace('|', "\\|").trim().to_string(),
        None => String::new(),
    }
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
        .collect();
    format!("| {} |", padded.join(" | "))
}
