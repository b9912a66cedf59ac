//! Init command implementation

use colored::Colorize;
use dialoguer::{Input, Password, theme::ColorfulTheme};

use crate::cli::CommandContext;
use crate::cli::args::GlobalOptions;
use crate::client::{Credentials, OrganizationsApi, OrganizationsClient};
use crate::config::Config;
use crate::error::Result;
use crate::output::progress;

/// Run the init command
///
/// Prompts for a region and static credentials, checks them against the
/// Organizations endpoint and writes the config file. A `--endpoint`
/// override is stored along with the rest.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}", "Welcome to orgform!".bold().green());
    println!("Let's set up your AWS configuration.\n");

    let mut config = CommandContext::load_config(opts)?;
    let theme = ColorfulTheme::default();

    let region: String = Input::with_theme(&theme)
        .with_prompt("AWS region")
        .default(config.region.clone())
        .interact_text()?;

    let mut key_prompt = Input::<String>::with_theme(&theme).with_prompt("AWS access key ID");
    if let Some(existing) = &config.credentials {
        key_prompt = key_prompt.default(existing.access_key_id.clone());
    }
    let access_key_id = key_prompt.interact_text()?;

    let secret_access_key: String = Password::with_theme(&theme)
        .with_prompt("AWS secret access key")
        .interact()?;

    let credentials = Credentials {
        access_key_id: access_key_id.trim().to_string(),
        secret_access_key,
        session_token: None,
    };

    // Verify the credentials; an account outside any organization is fine
    let client =
        OrganizationsClient::with_endpoint(credentials.clone(), &region, config.endpoint.clone())?;
    let spinner = progress::spinner("Verifying credentials...", opts.format);
    let verified = client.describe_organization().await;
    spinner.finish_and_clear();

    match verified {
        Ok(org) => println!(
            "{} Credentials valid; account belongs to organization {}",
            "✓".green(),
            org.id.bold()
        ),
        Err(e) if e.is_not_in_use() => println!(
            "{} Credentials valid; account is not part of an organization",
            "✓".green()
        ),
        Err(e) => return Err(e.into()),
    }

    config.region = region;
    config.credentials = Some(credentials);
    config.save_at(opts.config_ref())?;

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show configuration status", "orgform status".cyan());
    println!("  {} - Preview the organization", "orgform plan".cyan());

    Ok(())
}
