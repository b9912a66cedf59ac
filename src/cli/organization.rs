//! Organization lifecycle commands
//!
//! Each command resolves the instance address, loads its record from local
//! state, talks to AWS Organizations through the resource handler and writes
//! whatever the handler leaves behind back to state.

use colored::Colorize;
use dialoguer::Confirm;
use serde::Serialize;

use crate::cli::{ApplyArgs, CommandContext, NameArgs, OutputFormat};
use crate::error::{Error, Result};
use crate::output::{self, json, progress};
use crate::provider::ProviderContext;
use crate::resource::organization::TYPE_NAME;
use crate::resource::plan as planner;
use crate::resource::{self, Plan, ResourceConfig, ResourceData};

/// Plan as rendered in JSON output
#[derive(Debug, Serialize)]
struct PlanView<'a> {
    address: &'a str,
    plan: &'a Plan,
}

/// Build and validate the desired configuration from command flags
fn desired_config(ctx: &CommandContext, args: &ApplyArgs) -> Result<ResourceConfig> {
    let mut config = ResourceConfig::new();
    if let Some(feature_set) = &args.feature_set {
        config.insert("feature_set".to_string(), feature_set.clone());
    }
    ctx.organization().schema().validate(&config)?;
    Ok(config)
}

fn address_of(name: &NameArgs) -> String {
    resource::address(TYPE_NAME, &name.name)
}

/// Load the stored record and refresh it against the remote object
async fn refreshed_state(
    ctx: &CommandContext,
    provider: &ProviderContext,
    address: &str,
) -> Result<ResourceData> {
    let mut state = ctx.store.get(address)?.unwrap_or_else(ResourceData::new);
    if state.is_present() {
        let spinner = progress::spinner(&format!("Refreshing {}...", address), ctx.format);
        let result = planner::refresh(ctx.organization(), &mut state, provider).await;
        spinner.finish_and_clear();
        result?;
    }
    Ok(state)
}

fn print_plan(address: &str, planned: &Plan, prior: &ResourceData, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return json::print_json(&PlanView { address, plan: planned });
    }

    match planned {
        Plan::NoOp => println!("{} {}: no changes", "✓".green(), address.bold()),
        Plan::Create => println!("{} {} will be created", "+".green(), address.bold()),
        Plan::Delete => println!("{} {} will be destroyed", "-".red(), address.bold()),
        Plan::Replace { fields } => {
            println!(
                "{} {} must be replaced ({})",
                "-/+".yellow(),
                address.bold(),
                prior.id()
            );
            for field in fields {
                println!("    {} forces replacement", field);
            }
        }
    }
    Ok(())
}

/// Run the plan command
pub async fn plan(ctx: &CommandContext, args: &ApplyArgs) -> Result<()> {
    let desired = desired_config(ctx, args)?;
    let provider = ctx.provider()?;
    let address = address_of(&args.name);

    let prior = refreshed_state(ctx, &provider, &address).await?;
    let planned = planner::plan(ctx.organization().schema(), Some(&prior), Some(&desired));

    print_plan(&address, &planned, &prior, ctx.format)
}

/// Run the apply command
pub async fn apply(ctx: &CommandContext, args: &ApplyArgs, yes: bool, dry_run: bool) -> Result<()> {
    let desired = desired_config(ctx, args)?;
    let provider = ctx.provider()?;
    let address = address_of(&args.name);
    let resource = ctx.organization();

    let mut state = refreshed_state(ctx, &provider, &address).await?;
    // A dry run leaves local state untouched, even when the refresh found
    // the organization gone
    if !dry_run {
        ctx.store.put(&address, TYPE_NAME, &state)?;
    }

    let planned = planner::plan(resource.schema(), Some(&state), Some(&desired));
    let will_execute = !planned.is_noop() && !dry_run;

    // JSON output carries a single document: the plan or the final record
    if ctx.format != OutputFormat::Json || !will_execute {
        print_plan(&address, &planned, &state, ctx.format)?;
    }

    if !will_execute {
        if dry_run && ctx.format != OutputFormat::Json {
            eprintln!("{}", "Dry run: no changes made.".dimmed());
        }
        return Ok(());
    }

    // Replacing deletes the organization first
    if matches!(planned, Plan::Replace { .. }) && !yes {
        eprintln!(
            "{} Replacing {} deletes organization {} before creating a new one.",
            "⚠".yellow(),
            address,
            state.id()
        );
        eprintln!();

        let confirm = Confirm::new()
            .with_prompt("Confirm replacement?")
            .default(false)
            .interact()?;

        if !confirm {
            eprintln!("Cancelled.");
            return Ok(());
        }
    }

    let spinner = progress::spinner(
        &format!("Applying {} ({})...", address, planned.verb()),
        ctx.format,
    );
    let result = planner::execute(resource, &planned, &mut state, Some(&desired), &provider).await;
    spinner.finish_and_clear();

    // Record partial progress before reporting a failure
    ctx.store.put(&address, TYPE_NAME, &state)?;
    result?;

    if ctx.format != OutputFormat::Json {
        println!("{} Apply complete", "✓".green());
    }
    output::print_record(&address, &state, ctx.format)
}

/// Run the refresh command
pub async fn refresh(ctx: &CommandContext, name: &NameArgs) -> Result<()> {
    let address = address_of(name);
    if ctx.store.get(&address)?.is_none() {
        return Err(Error::Other(format!("No state for {}", address)));
    }

    let provider = ctx.provider()?;
    let state = refreshed_state(ctx, &provider, &address).await?;
    ctx.store.put(&address, TYPE_NAME, &state)?;

    if state.is_present() {
        output::print_record(&address, &state, ctx.format)
    } else {
        match ctx.format {
            OutputFormat::Json => {
                json::print_json(&serde_json::json!({ "removed": address }))?;
            }
            _ => println!(
                "{} Organization no longer exists; removed {} from state",
                "⚠".yellow(),
                address.bold()
            ),
        }
        Ok(())
    }
}

/// Run the import command
pub async fn import(ctx: &CommandContext, id: &str, name: &NameArgs) -> Result<()> {
    let address = address_of(name);
    if let Some(existing) = ctx.store.get(&address)? {
        return Err(Error::Other(format!(
            "{} is already managed (id {}); remove it with `orgform state rm {}` first",
            address,
            existing.id(),
            address
        )));
    }

    let provider = ctx.provider()?;
    let resource = ctx.organization();

    let spinner = progress::spinner(&format!("Importing {}...", id), ctx.format);
    let result = async {
        let mut data = resource.import(id, &provider).await?;
        resource.read(&mut data, &provider).await?;
        Ok::<_, Error>(data)
    }
    .await;
    spinner.finish_and_clear();
    let data = result?;

    if !data.is_present() {
        return Err(Error::Other(format!(
            "Cannot import non-existent remote object: organization {}",
            id
        )));
    }

    ctx.store.put(&address, TYPE_NAME, &data)?;

    if ctx.format != OutputFormat::Json {
        println!("{} Imported {}", "✓".green(), address.bold());
    }
    output::print_record(&address, &data, ctx.format)
}

/// Run the show command; reads local state only
pub fn show(ctx: &CommandContext, name: &NameArgs) -> Result<()> {
    let address = address_of(name);
    let data = ctx
        .store
        .get(&address)?
        .ok_or_else(|| Error::Other(format!("No state for {}", address)))?;

    output::print_record(&address, &data, ctx.format)
}

/// Run the destroy command
pub async fn destroy(ctx: &CommandContext, name: &NameArgs, yes: bool) -> Result<()> {
    let address = address_of(name);
    if ctx.store.get(&address)?.is_none() {
        println!("Nothing to destroy: {} is not in state", address);
        return Ok(());
    }

    let provider = ctx.provider()?;
    let resource = ctx.organization();

    let mut state = refreshed_state(ctx, &provider, &address).await?;
    if !state.is_present() {
        ctx.store.put(&address, TYPE_NAME, &state)?;
        println!(
            "Nothing to destroy: organization behind {} is already gone",
            address
        );
        return Ok(());
    }

    if !yes {
        eprintln!(
            "{} Delete organization {}? This cannot be undone.",
            "⚠".yellow(),
            state.id()
        );
        eprintln!("  All member accounts must be removed first.");
        eprintln!();

        let confirm = Confirm::new()
            .with_prompt("Confirm deletion?")
            .default(false)
            .interact()?;

        if !confirm {
            eprintln!("Cancelled.");
            return Ok(());
        }
    }

    let id = state.id().to_string();
    let spinner = progress::spinner(&format!("Destroying {}...", address), ctx.format);
    let result = planner::execute(resource, &Plan::Delete, &mut state, None, &provider).await;
    spinner.finish_and_clear();

    ctx.store.put(&address, TYPE_NAME, &state)?;
    result?;

    match ctx.format {
        OutputFormat::Json => {
            json::print_json(&serde_json::json!({ "deleted": true, "address": address, "id": id }))?;
        }
        _ => println!("{} Destroyed {} ({})", "✓".green(), address.bold(), id),
    }

    Ok(())
}
