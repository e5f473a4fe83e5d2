use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `vgl` binary.
#[derive(Debug, Parser)]
#[command(
    name = "vgl",
    version,
    about = "Vigil - third-party script risk analysis"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory containing `.vigil/` (defaults to auto-detect)
    #[arg(short = 'C', long, global = true)]
    pub config_dir: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            config_dir: self.config_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::ChatCommands;
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "vgl",
            "--format",
            "table",
            "--limit",
            "10",
            "--verbose",
            "analyses",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Analyses(_)));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["vgl", "analyses", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["vgl", "--format", "xml", "analyses"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn analyze_takes_url_and_optional_script_file() {
        let cli = Cli::try_parse_from([
            "vgl",
            "analyze",
            "https://shop.example.com/",
            "--scripts",
            "scripts.txt",
        ])
        .expect("cli should parse");

        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.url, "https://shop.example.com/");
        assert_eq!(args.scripts.as_deref(), Some("scripts.txt"));
    }

    #[test]
    fn classify_requires_page_host() {
        assert!(Cli::try_parse_from(["vgl", "classify", "https://evil-tracker.io/x.js"]).is_err());

        let cli = Cli::try_parse_from([
            "vgl",
            "classify",
            "https://evil-tracker.io/x.js",
            "--page-host",
            "shop.example.com",
        ])
        .expect("cli should parse");
        let Commands::Classify(args) = cli.command else {
            panic!("expected classify");
        };
        assert_eq!(args.page_host, "shop.example.com");
    }

    #[test]
    fn chat_init_key_and_url_are_exclusive() {
        let parsed = Cli::try_parse_from([
            "vgl",
            "chat",
            "init",
            "s-1",
            "--key",
            "analysis:x:1",
            "--url",
            "https://shop.example.com/",
        ]);
        assert!(parsed.is_err());

        let cli = Cli::try_parse_from(["vgl", "chat", "init", "s-1", "--url", "https://a.io/"])
            .expect("cli should parse");
        let Commands::Chat { action } = cli.command else {
            panic!("expected chat");
        };
        assert!(matches!(
            action,
            ChatCommands::Init { ref session_id, ref url, key: None }
                if session_id == "s-1" && url.as_deref() == Some("https://a.io/")
        ));
    }

    #[test]
    fn chat_send_takes_session_and_message() {
        let cli = Cli::try_parse_from(["vgl", "chat", "send", "s-1", "Is it safe?"])
            .expect("cli should parse");
        let Commands::Chat { action } = cli.command else {
            panic!("expected chat");
        };
        assert!(matches!(
            action,
            ChatCommands::Send { ref session_id, ref message }
                if session_id == "s-1" && message == "Is it safe?"
        ));
    }

    #[test]
    fn schema_name_is_optional() {
        let cli = Cli::try_parse_from(["vgl", "schema"]).expect("cli should parse");
        assert!(matches!(cli.command, Commands::Schema(ref args) if args.name.is_none()));
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["vgl", "--config-dir", "/tmp/demo", "analyses"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.config_dir.as_deref(), Some("/tmp/demo"));
    }
}
