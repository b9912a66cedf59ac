//! orgform - manage an AWS Organization as a declarative resource

use clap::{CommandFactory, Parser};
use clap_complete::CompleteEnv;

mod cli;
mod client;
mod config;
mod error;
mod output;
mod provider;
mod resource;
mod state;

use cli::args::GlobalOptions;
use cli::{Cli, CommandContext, Commands, StateCommands};
use error::Result;

#[tokio::main]
async fn main() {
    // Dynamic completions exit here when COMPLETE is set
    CompleteEnv::with_factory(Cli::command).complete();

    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Init => cli::init::run(&opts).await,
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("orgform version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Schema { resource_type } => cli::schema::run(&resource_type, opts.format),
        Commands::Completion { shell } => {
            cli::completions::generate(shell, &mut std::io::stdout());
            Ok(())
        }
        Commands::Plan(args) => {
            let ctx = CommandContext::new(&opts)?;
            cli::organization::plan(&ctx, &args).await
        }
        Commands::Apply { args, yes, dry_run } => {
            let ctx = CommandContext::new(&opts)?;
            cli::organization::apply(&ctx, &args, yes, dry_run).await
        }
        Commands::Refresh(name) => {
            let ctx = CommandContext::new(&opts)?;
            cli::organization::refresh(&ctx, &name).await
        }
        Commands::Import { id, name } => {
            let ctx = CommandContext::new(&opts)?;
            cli::organization::import(&ctx, &id, &name).await
        }
        Commands::Show(name) => {
            let ctx = CommandContext::new(&opts)?;
            cli::organization::show(&ctx, &name)
        }
        Commands::Destroy { name, yes } => {
            let ctx = CommandContext::new(&opts)?;
            cli::organization::destroy(&ctx, &name, yes).await
        }
        Commands::State(state_cmd) => {
            let ctx = CommandContext::new(&opts)?;
            match state_cmd {
                StateCommands::List => cli::state::list(&ctx),
                StateCommands::Rm { address } => cli::state::rm(&ctx, &address),
            }
        }
    }
}
