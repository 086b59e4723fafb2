//! Aula CLI entry point.
//!
//! Binary name: `aula`
//!
//! Parses CLI arguments, sets up tracing, opens the draft database and
//! remote clients, then dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use aula_observe::tracing_setup::{filter_for_verbosity, init_tracing, shutdown_tracing};
use cli::{AuthCommand, Cli, Commands, ConfigCommand, DraftsCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "aula", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(cli.otel, filter_for_verbosity(cli.verbose, cli.quiet))
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Initialize application state (config, DB, remote clients)
    let state = AppState::init().await?;

    match cli.command {
        Commands::New {
            content_type,
            topic,
        } => {
            cli::wizard::run_new(&state, content_type, topic, cli.json).await?;
        }

        Commands::Resume { content_type } => {
            cli::wizard::run_resume(&state, content_type, cli.json).await?;
        }

        Commands::Drafts { action } => match action {
            DraftsCommand::List => {
                cli::drafts::list_drafts(&state, cli.json).await?;
            }
            DraftsCommand::Clear {
                content_type,
                force,
            } => {
                cli::drafts::clear_drafts(&state, content_type, force, cli.json).await?;
            }
        },

        Commands::Auth { action } => match action {
            AuthCommand::SetToken { token, expires_at } => {
                cli::auth::set_token(&state, token, expires_at, cli.json).await?;
            }
            AuthCommand::Clear => {
                cli::auth::clear_token(&state, cli.json).await?;
            }
            AuthCommand::Status => {
                cli::auth::status(&state, cli.json).await?;
            }
        },

        Commands::Config { action } => match action {
            ConfigCommand::Show => {
                cli::config::show_config(&state, cli.json).await?;
            }
        },

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
