//! Common CLI types shared across commands

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty format - human-optimized rich formatting (global default)
    #[default]
    Pretty,
    /// Table format - one row per attribute or entry
    Table,
    /// JSON format - structured for scripts
    Json,
}
