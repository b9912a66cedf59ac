//! Global CLI options shared across all commands

use std::path::Path;

use crate::cli::{Cli, OutputFormat};

/// Global CLI options passed to all command handlers.
///
/// Precedence is: CLI flag > environment variable > config file > default.
/// This struct captures the CLI layer; environment and file values are
/// merged in `CommandContext`.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Output format (pretty, table, json)
    pub format: OutputFormat,

    /// Custom config file path (defaults to ~/.orgform/config.yaml)
    pub config: Option<String>,

    /// Custom state directory (defaults to ~/.orgform)
    pub state_dir: Option<String>,

    /// Region override
    pub region: Option<String>,

    /// Organizations endpoint override
    pub endpoint: Option<String>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            state_dir: cli.state_dir.clone(),
            region: cli.region.clone(),
            endpoint: cli.endpoint.clone(),
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    /// Get state directory as `Option<&Path>`.
    pub fn state_dir_ref(&self) -> Option<&Path> {
        self.state_dir.as_deref().map(Path::new)
    }
}
