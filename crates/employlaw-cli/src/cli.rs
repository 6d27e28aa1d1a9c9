//! Command-line configuration. Every option can also come from the environment.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "employlaw",
    version,
    about = "Ask UK employment law questions and export the generated report"
)]
pub struct Cli {
    /// Base URL of the generation backend.
    #[arg(long, env = "EMPLOYLAW_ENDPOINT", default_value = "http://localhost:4000")]
    pub endpoint: String,

    /// Bearer token sent to the generation backend.
    #[arg(long, env = "EMPLOYLAW_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Directory exported documents are written to.
    #[arg(long, env = "EMPLOYLAW_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Program that receives shared reports on stdin, e.g. "mail -s report hr@example.com".
    #[arg(long, env = "EMPLOYLAW_SHARE_COMMAND")]
    pub share_command: Option<String>,

    /// Render reports without colour or styling.
    #[arg(long)]
    pub no_color: bool,

    /// Log verbosity (logs go to stderr).
    #[arg(long, env = "EMPLOYLAW_LOG_LEVEL", default_value = "warn")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ask a single question, print the report, and exit.
    Ask {
        /// The question; multiple words are joined with spaces.
        #[arg(required = true)]
        query: Vec<String>,

        /// Also export the report as a Word document.
        #[arg(long)]
        export: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_start_interactive_session() {
        let cli = Cli::try_parse_from(["employlaw"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert_eq!(cli.log_level, tracing::Level::WARN);
        assert!(!cli.no_color);
    }

    #[test]
    fn ask_joins_words() {
        let cli = Cli::try_parse_from([
            "employlaw",
            "--endpoint",
            "https://backend.example",
            "ask",
            "--export",
            "Am",
            "I",
            "entitled?",
        ])
        .unwrap();
        assert_eq!(cli.endpoint, "https://backend.example");
        match cli.command {
            Some(Command::Ask { query, export }) => {
                assert_eq!(query.join(" "), "Am I entitled?");
                assert!(export);
            }
            other => panic!("expected ask, got {other:?}"),
        }
    }

    #[test]
    fn ask_requires_a_query() {
        assert!(Cli::try_parse_from(["employlaw", "ask"]).is_err());
    }

    #[test]
    fn log_level_parses() {
        let cli = Cli::try_parse_from(["employlaw", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, tracing::Level::DEBUG);
    }
}
