//! Chatrizz admin CLI
//!
//! Every command prints its result as pretty JSON on stdout. Logs and
//! session notices go to stderr.

mod commands;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chatrizz_domain::{Config, LogFormat};
use chatrizz_infra::{config, AdminSession, TracingSessionObserver};
use clap::Parser;
use commands::Commands;
use tracing::{debug, error};

#[derive(Debug, Parser)]
#[command(name = "chatrizz-admin")]
#[command(about = "Operate the Chatrizz admin API from the terminal")]
#[command(version)]
struct Cli {
    /// Config file (TOML or JSON); standard locations are probed otherwise
    #[arg(short = 'c', long, global = true, env = "CHATRIZZ_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `chatrizz_infra=trace`
    #[arg(short = 'l', long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Apply logging flags on top of the loaded configuration.
    fn apply_to(&self, config: &mut Config) {
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
        if self.json {
            config.logging.format = LogFormat::Json;
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_json(value: &serde_json::Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{rendered}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = config::load_with(cli.config.clone()).context("Failed to load configuration")?;
    cli.apply_to(&mut config);
    logging::init_logging(&config.logging.level, config.logging.format)?;

    if let Ok(path) = dotenv {
        debug!(path = %path.display(), "loaded .env");
    }
    debug!(base_url = %config.api.base_url, store = ?config.session.store, "configuration loaded");

    let session = AdminSession::connect(&config, Arc::new(TracingSessionObserver))
        .context("Failed to set up the API session")?;

    let name = cli.command.name();
    match cli.command.execute(&session).await {
        Ok(output) => print_json(&output),
        Err(e) => {
            error!(command = name, error = %e, "command failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;
    use crate::commands::{ContentCommands, UserCommands};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let cli = Cli::try_parse_from(["chatrizz-admin", "status", "--json", "-l", "debug"]).unwrap();

        let mut config = Config::default();
        cli.apply_to(&mut config);

        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "debug");
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn parses_nested_listing_arguments() {
        let cli = Cli::try_parse_from([
            "chatrizz-admin",
            "users",
            "content",
            "u-1",
            "--kind",
            "review",
            "--page",
            "3",
        ])
        .unwrap();

        match cli.command {
            Commands::Users { command: UserCommands::Content { id, kind, list } } => {
                assert_eq!(id, "u-1");
                assert_eq!(kind, Some(chatrizz_domain::ContentKind::Review));
                assert_eq!(list.page, Some(3));
                assert_eq!(list.search, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_content_kind() {
        let result = Cli::try_parse_from(["chatrizz-admin", "content", "delete", "story", "9"]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_content_delete() {
        let cli = Cli::try_parse_from(["chatrizz-admin", "content", "delete", "post", "p-9"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Content { command: ContentCommands::Delete { id, .. } } if id == "p-9"
        ));
    }

    #[test]
    fn login_reads_credentials_from_flags() {
        let cli = Cli::try_parse_from([
            "chatrizz-admin",
            "login",
            "--email",
            "ops@chatrizz.co",
            "--password",
            "hunter22",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Commands::Login { ref email, .. } if email == "ops@chatrizz.co"
        ));
    }
}
