//! Command execution context
//!
//! Provides a unified context for command execution, eliminating boilerplate
//! for config loading, state opening and client initialization.

use std::path::PathBuf;

use crate::cli::{GlobalOptions, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::provider::ProviderContext;
use crate::resource::{self, Resource};
use crate::state::StateStore;

/// Context for command execution containing config, state and output options.
pub struct CommandContext {
    /// Merged configuration (file, environment, CLI flags)
    pub config: Config,
    /// Local state store
    pub store: StateStore,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// Loads the config file (defaults when missing), applies environment
    /// and CLI overrides and opens the state store. Credentials are not
    /// required until [`CommandContext::provider`] is called.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Self::load_config(opts)?;

        let state_dir: Option<PathBuf> = opts
            .state_dir_ref()
            .map(|p| p.to_path_buf())
            .or_else(|| config.state_dir.clone());
        let store = StateStore::open(state_dir.as_deref())?;
        log::debug!("State database: {}", store.path().display());

        Ok(Self {
            config,
            store,
            format: opts.format,
        })
    }

    /// Load config and merge environment and CLI overrides
    pub fn load_config(opts: &GlobalOptions) -> Result<Config> {
        let mut config = Config::load_at(opts.config_ref())?;
        config.apply_env();

        if let Some(region) = &opts.region {
            config.region = region.clone();
        }
        if let Some(endpoint) = &opts.endpoint {
            config.endpoint = Some(endpoint.clone());
        }

        Ok(config)
    }

    /// Build the provider context; fails if no credentials are configured.
    pub fn provider(&self) -> Result<ProviderContext> {
        ProviderContext::from_config(&self.config)
    }

    /// Organization resource handler
    pub fn organization(&self) -> &'static dyn Resource {
        &resource::OrganizationResource
    }
}
