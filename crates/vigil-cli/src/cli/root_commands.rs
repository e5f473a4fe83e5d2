use clap::{Args, Subcommand};

use crate::cli::subcommands::ChatCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Render a page and classify its third-party scripts.
    Analyze(AnalyzeArgs),
    /// List stored analyses.
    Analyses(AnalysesArgs),
    /// Classify one script URL without rendering or storing.
    Classify(ClassifyArgs),
    /// Chat about an analysis.
    Chat {
        #[command(subcommand)]
        action: ChatCommands,
    },
    /// Delete stored analyses older than a cutoff.
    Prune(PruneArgs),
    /// Dump JSON schema for a registered type.
    Schema(SchemaArgs),
}

/// Arguments for `vgl analyze`.
#[derive(Clone, Debug, Args)]
pub struct AnalyzeArgs {
    /// Page URL (http or https).
    pub url: String,
    /// Read script URLs from FILE instead of calling the renderer.
    ///
    /// Either a JSON array or one URL per line (`#` starts a comment).
    #[arg(long, value_name = "FILE")]
    pub scripts: Option<String>,
}

/// Arguments for `vgl analyses`.
#[derive(Clone, Debug, Args)]
pub struct AnalysesArgs {
    /// Only analyses of this page URL.
    #[arg(long)]
    pub url: Option<String>,
}

/// Arguments for `vgl classify`.
#[derive(Clone, Debug, Args)]
pub struct ClassifyArgs {
    /// Script URL to classify.
    pub script_url: String,
    /// Host of the page the script was found on.
    #[arg(long)]
    pub page_host: String,
}

/// Arguments for `vgl prune`.
#[derive(Clone, Debug, Args)]
pub struct PruneArgs {
    /// Age cutoff in days (defaults to `storage.retention_days`).
    #[arg(long)]
    pub older_than_days: Option<u32>,
}

/// Arguments for `vgl schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Schema name; lists all names when omitted.
    pub name: Option<String>,
}
