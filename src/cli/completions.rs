//! Shell completions for orgform
//!
//! Static scripts cover subcommands and flags. Dynamic completion adds the
//! resource addresses recorded in local state.
//!
//! Shell support:
//! - Fish/Zsh: Full support with descriptions
//! - Bash: Values only (no description display)

use std::io::Write;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::engine::{ArgValueCandidates, CompletionCandidate};

use crate::cli::{Cli, Shell};
use crate::config::Config;
use crate::state::StateStore;

/// Write a static completion script for `shell` to `out`
pub fn generate(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, out);
}

/// Open the state store the way a normal command would.
///
/// Completions should never break the shell, so all errors are silent.
fn completion_store() -> Option<StateStore> {
    let config_path = std::env::var("ORGFORM_CONFIG").ok();
    let config = Config::load_at(config_path.as_deref()).ok()?;

    let state_dir: Option<PathBuf> = std::env::var("ORGFORM_STATE_DIR")
        .ok()
        .map(PathBuf::from)
        .or(config.state_dir);

    StateStore::open(state_dir.as_deref()).ok()
}

/// Complete resource addresses from local state.
///
/// Format: `{address}` with help `{id}`
pub fn complete_state_addresses() -> Vec<CompletionCandidate> {
    let Some(store) = completion_store() else {
        return vec![];
    };

    let Ok(entries) = store.list() else {
        return vec![];
    };

    entries
        .into_iter()
        .map(|entry| {
            let help = entry.data.id().to_string();
            CompletionCandidate::new(entry.address).help(Some(help.into()))
        })
        .collect()
}

/// Create completion candidates for state addresses.
pub fn state_address_candidates() -> ArgValueCandidates {
    ArgValueCandidates::new(complete_state_addresses)
}
