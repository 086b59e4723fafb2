//! CLI command definitions for the `aula` binary.
//!
//! Uses clap derive macros for argument parsing. `aula new` and `aula resume`
//! run the interactive wizard; the other commands manage drafts, the stored
//! session and configuration.

pub mod auth;
pub mod config;
pub mod drafts;
pub mod prompts;
pub mod render;
pub mod wizard;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use aula_types::wizard::ContentType;

/// Plan lessons, activities and assessments from the terminal.
#[derive(Parser)]
#[command(name = "aula", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a new request (resumes a saved draft of the same type).
    New {
        /// Content type: lesson_plan, activity or assessment.
        #[arg(long = "type", short = 't')]
        content_type: Option<ContentType>,

        /// Pre-fill the topic (ignored when a draft is resumed).
        #[arg(long)]
        topic: Option<String>,
    },

    /// Pick a saved draft and continue it.
    Resume {
        /// Resume this content type directly instead of choosing.
        content_type: Option<ContentType>,
    },

    /// Manage saved drafts.
    Drafts {
        #[command(subcommand)]
        action: DraftsCommand,
    },

    /// Manage the stored access token.
    Auth {
        #[command(subcommand)]
        action: AuthCommand,
    },

    /// Inspect configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum DraftsCommand {
    /// List saved drafts, newest first.
    #[command(alias = "ls")]
    List,

    /// Delete saved drafts.
    Clear {
        /// Only this content type.
        #[arg(long = "type", short = 't')]
        content_type: Option<ContentType>,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum AuthCommand {
    /// Store an access token in the OS keychain.
    SetToken {
        /// Token value (prompted securely when omitted).
        #[arg(long)]
        token: Option<String>,

        /// Token expiry as an RFC 3339 timestamp.
        #[arg(long)]
        expires_at: Option<String>,
    },

    /// Remove the stored access token.
    Clear,

    /// Show whether a usable session is available.
    Status,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration.
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_new_with_type_alias_and_topic() {
        let cli = Cli::try_parse_from(["aula", "new", "--type", "quiz", "--topic", "Fractions"])
            .unwrap();
        match cli.command {
            Commands::New {
                content_type,
                topic,
            } => {
                assert_eq!(content_type, Some(ContentType::Assessment));
                assert_eq!(topic.as_deref(), Some("Fractions"));
            }
            _ => panic!("expected New"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["aula", "drafts", "list", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Drafts {
                action: DraftsCommand::List
            }
        ));
    }

    #[test]
    fn test_rejects_unknown_content_type() {
        assert!(Cli::try_parse_from(["aula", "new", "--type", "essay"]).is_err());
    }
}
