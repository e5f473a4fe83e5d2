use clap::Subcommand;

/// Chat session commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ChatCommands {
    /// Create or reset a session, optionally bound to a stored analysis.
    Init {
        session_id: String,
        /// Bind the stored analysis with this key.
        #[arg(long, conflicts_with = "url")]
        key: Option<String>,
        /// Bind the most recent stored analysis of this page URL.
        #[arg(long)]
        url: Option<String>,
    },
    /// Ask a question in a session.
    Send { session_id: String, message: String },
    /// Show a session's messages and bound analysis.
    History { session_id: String },
}
