//! State command implementations

use colored::Colorize;
use tabled::Tabled;

use crate::cli::CommandContext;
use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::output::{json, table};
use crate::state::StateEntry;

/// State entry for table display
#[derive(Tabled)]
struct EntryDisplay {
    #[tabled(rename = "ADDRESS")]
    address: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "UPDATED")]
    updated: String,
}

impl From<&StateEntry> for EntryDisplay {
    fn from(entry: &StateEntry) -> Self {
        Self {
            address: entry.address.clone(),
            id: entry.data.id().to_string(),
            updated: entry.updated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

/// Run the state list command
pub fn list(ctx: &CommandContext) -> Result<()> {
    let entries = ctx.store.list()?;

    match ctx.format {
        OutputFormat::Json => json::print_json(&entries)?,
        OutputFormat::Table | OutputFormat::Pretty => {
            let rows: Vec<EntryDisplay> = entries.iter().map(EntryDisplay::from).collect();
            println!("{}", table::format_table(&rows, "No resources in state."));
        }
    }

    Ok(())
}

/// Run the state rm command; the remote object is left untouched
pub fn rm(ctx: &CommandContext, address: &str) -> Result<()> {
    if !ctx.store.remove(address)? {
        return Err(Error::Other(format!("No state for {}", address)));
    }

    match ctx.format {
        OutputFormat::Json => {
            json::print_json(&serde_json::json!({ "removed": address }))?;
        }
        _ => println!("{} Removed {} from state", "✓".green(), address.bold()),
    }

    Ok(())
}
