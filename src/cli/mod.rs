//! CLI command definitions and handlers

use clap::{Args, Parser, Subcommand};
pub use clap_complete::Shell;

use completions::state_address_candidates;

pub mod args;
pub mod completions;
pub mod context;
pub mod init;
pub mod organization;
pub mod schema;
pub mod state;
pub mod status;

pub use args::{GlobalOptions, OutputFormat};
pub use context::CommandContext;

/// orgform - manage an AWS Organization as a declarative resource
#[derive(Parser, Debug)]
#[command(name = "orgform")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "ORGFORM_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "ORGFORM_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override state directory
    #[arg(long, global = true, env = "ORGFORM_STATE_DIR", hide_env = true)]
    pub state_dir: Option<String>,

    /// Override AWS region
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Override the Organizations endpoint URL
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "ORGFORM_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize orgform configuration
    Init,

    /// Show configuration and state status
    Status,

    /// Display version information
    Version,

    /// Show the attribute table of a resource type
    Schema {
        /// Resource type
        #[arg(default_value = "aws_organization")]
        resource_type: String,
    },

    /// Show what apply would change
    Plan(ApplyArgs),

    /// Create or replace the organization to match configuration
    Apply {
        #[command(flatten)]
        args: ApplyArgs,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,

        /// Print the plan without making changes
        #[arg(long)]
        dry_run: bool,
    },

    /// Re-read the organization and update state
    Refresh(NameArgs),

    /// Adopt an existing organization into state
    Import {
        /// Organization ID (o-...)
        id: String,

        #[command(flatten)]
        name: NameArgs,
    },

    /// Show the stored organization record
    Show(NameArgs),

    /// Delete the organization
    Destroy {
        #[command(flatten)]
        name: NameArgs,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Inspect or edit local state
    #[command(subcommand)]
    State(StateCommands),

    /// Generate shell completions (static)
    #[command(after_help = "\
Static completions (subcommands/flags only):
  bash:   orgform completion bash > /etc/bash_completion.d/orgform
  zsh:    orgform completion zsh > \"${fpath[1]}/_orgform\"
  fish:   orgform completion fish > ~/.config/fish/completions/orgform.fish

Dynamic completions (includes addresses from local state):
  bash:   echo 'source <(COMPLETE=bash orgform)' >> ~/.bashrc
  zsh:    echo 'source <(COMPLETE=zsh orgform)' >> ~/.zshrc
  fish:   echo 'COMPLETE=fish orgform | source' >> ~/.config/fish/config.fish")]
    Completion {
        /// Shell to generate completions for (static only)
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Resource instance selector
#[derive(Debug, Clone, Args)]
pub struct NameArgs {
    /// Resource instance name; the state address is aws_organization.<NAME>
    #[arg(long, default_value = "main")]
    pub name: String,
}

/// Desired configuration of the organization resource
#[derive(Debug, Clone, Args)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub name: NameArgs,

    /// Feature set: ALL or CONSOLIDATED_BILLING (default ALL)
    #[arg(long)]
    pub feature_set: Option<String>,
}

/// State subcommands
#[derive(Subcommand, Debug)]
pub enum StateCommands {
    /// List stored resources
    List,

    /// Forget a resource without touching the remote object
    Rm {
        /// Resource address (e.g. aws_organization.main)
        #[arg(add = state_address_candidates())]
        address: String,
    },
}
