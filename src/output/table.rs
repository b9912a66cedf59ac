//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// One attribute of a record
#[derive(Tabled)]
struct AttributeRow<'a> {
    #[tabled(rename = "ATTRIBUTE")]
    name: &'a str,
    #[tabled(rename = "VALUE")]
    value: &'a str,
}

/// Render rows as a rounded table, or `empty` when there are none
pub fn format_table<T: Tabled>(rows: &[T], empty: &str) -> String {
    if rows.is_empty() {
        return empty.to_string();
    }

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

/// Render name/value pairs as a two-column attribute table
pub fn format_attributes<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let rows: Vec<AttributeRow<'a>> = pairs
        .into_iter()
        .map(|(name, value)| AttributeRow { name, value })
        .collect();
    format_table(&rows, "No attributes.")
}
