//! Schema command implementation

use colored::Colorize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::output::{json, table};
use crate::resource::{self, FieldMode, FieldSchema};

/// Field for table display
#[derive(Tabled)]
struct FieldDisplay {
    #[tabled(rename = "ATTRIBUTE")]
    name: String,
    #[tabled(rename = "MODE")]
    mode: String,
    #[tabled(rename = "FORCE NEW")]
    force_new: String,
    #[tabled(rename = "DEFAULT")]
    default: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
}

impl From<&FieldSchema> for FieldDisplay {
    fn from(field: &FieldSchema) -> Self {
        Self {
            name: field.name.to_string(),
            mode: mode_label(field.mode).to_string(),
            force_new: if field.force_new { "yes" } else { "" }.to_string(),
            default: field.default.unwrap_or("").to_string(),
            description: field.description.to_string(),
        }
    }
}

fn mode_label(mode: FieldMode) -> &'static str {
    match mode {
        FieldMode::Required => "required",
        FieldMode::Optional => "optional",
        FieldMode::Computed => "computed",
    }
}

/// Run the schema command
pub fn run(resource_type: &str, format: OutputFormat) -> Result<()> {
    let resource = resource::lookup(resource_type)
        .ok_or_else(|| Error::Other(format!("Unknown resource type: {}", resource_type)))?;
    let schema = resource.schema();

    match format {
        OutputFormat::Json => {
            json::print_json(schema)?;
        }
        OutputFormat::Table => {
            let rows: Vec<FieldDisplay> = schema.fields.iter().map(FieldDisplay::from).collect();
            println!("{}", table::format_table(&rows, "No attributes."));
        }
        OutputFormat::Pretty => {
            let importable = if schema.importable {
                "importable".green()
            } else {
                "not importable".dimmed()
            };
            println!("{} ({})\n", schema.type_name.bold(), importable);

            let rows: Vec<FieldDisplay> = schema.fields.iter().map(FieldDisplay::from).collect();
            println!("{}", table::format_table(&rows, "No attributes."));
        }
    }

    Ok(())
}
