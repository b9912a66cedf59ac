//! Output formatting for CLI results

use colored::Colorize;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::resource::ResourceData;

pub mod json;
pub mod progress;
pub mod table;

/// A resource record as rendered to the user
#[derive(Debug, Serialize)]
pub struct RecordView<'a> {
    pub address: &'a str,
    pub id: &'a str,
    pub attributes: &'a std::collections::BTreeMap<String, String>,
}

impl<'a> RecordView<'a> {
    pub fn new(address: &'a str, data: &'a ResourceData) -> Self {
        Self {
            address,
            id: data.id(),
            attributes: data.attributes(),
        }
    }
}

/// Format a resource record
pub fn format_record(address: &str, data: &ResourceData, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format_json(&RecordView::new(address, data)),
        OutputFormat::Table => Ok(table::format_attributes(
            std::iter::once(("id", data.id()))
                .chain(data.attributes().iter().map(|(k, v)| (k.as_str(), v.as_str()))),
        )),
        OutputFormat::Pretty => {
            let width = data
                .attributes()
                .keys()
                .map(String::len)
                .max()
                .unwrap_or(0)
                .max(2);
            let mut out = format!("{}\n", address.bold());
            out.push_str(&format!("  {:<width$}  {}\n", "id", data.id().cyan(), width = width));
            for (name, value) in data.attributes() {
                out.push_str(&format!("  {:<width$}  {}\n", name, value, width = width));
            }
            Ok(out.trim_end().to_string())
        }
    }
}

/// Format and print a resource record to stdout
pub fn print_record(address: &str, data: &ResourceData, format: OutputFormat) -> Result<()> {
    println!("{}", format_record(address, data, format)?);
    Ok(())
}
