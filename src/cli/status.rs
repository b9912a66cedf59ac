//! Status command implementation

use colored::Colorize;

use crate::cli::CommandContext;
use crate::cli::args::GlobalOptions;
use crate::config::Config;
use crate::error::Result;

/// Mask all but the last four characters of an access key
fn mask_key(key: &str) -> String {
    let visible = key.len().saturating_sub(4);
    match key.get(visible..) {
        Some(tail) if visible > 0 => format!("{}{}", "*".repeat(visible), tail),
        _ => "*".repeat(key.len()),
    }
}

/// Run the status command to display configuration and state status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "orgform Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;
    if config_path.exists() {
        println!("Config file: {}", config_path.display().to_string().cyan());
    } else {
        println!(
            "Config file: {} {}",
            config_path.display().to_string().cyan(),
            "(not found, using defaults)".dimmed()
        );
    }

    let ctx = CommandContext::new(opts)?;
    let config = &ctx.config;

    println!();
    println!("{} Region: {}", "✓".green(), config.region);
    match &config.endpoint {
        Some(endpoint) => println!("{} Endpoint: {}", "✓".green(), endpoint),
        None => println!("{} Endpoint: partition default", "○".dimmed()),
    }

    match &config.credentials {
        Some(credentials) => {
            println!(
                "{} Credentials configured ({})",
                "✓".green(),
                mask_key(&credentials.access_key_id)
            );
            if credentials.session_token.is_some() {
                println!("  Session token present");
            }
        }
        None => {
            println!("{} Credentials not configured", "✗".red());
            println!("  → Run 'orgform init' or set AWS_ACCESS_KEY_ID/AWS_SECRET_ACCESS_KEY");
        }
    }

    let entries = ctx.store.list()?;
    println!();
    println!("State: {}", ctx.store.path().display().to_string().cyan());
    println!("Resources tracked: {}", entries.len());

    Ok(())
}
