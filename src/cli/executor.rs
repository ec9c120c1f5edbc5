//! Dispatches a parsed command to its handler

use super::handlers::{MigrateCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::{Environment, Settings};

/// Runs the selected subcommand; no subcommand starts the server.
pub async fn execute_command(
    cli: &Cli,
    settings: Settings,
    environment: Environment,
) -> anyhow::Result<()> {
    warn_on_risky_args(&cli.command(), &settings);

    match cli.command() {
        Commands::Serve { dry_run, .. } => {
            ServeCommandHandler::new(settings, environment)
                .execute(dry_run)
                .await
        }
        Commands::Migrate { dry_run, rollback } => {
            MigrateCommandHandler::new(settings)
                .execute(dry_run, rollback)
                .await?;
            Ok(())
        }
    }
}

fn warn_on_risky_args(command: &Commands, settings: &Settings) {
    match command {
        Commands::Serve { .. } if settings.server.port < 1024 => {
            tracing::warn!(
                port = settings.server.port,
                "Binding to a privileged port typically requires root privileges"
            );
        }
        Commands::Migrate {
            rollback: Some(steps),
            ..
        } if *steps > 10 => {
            tracing::warn!(steps, "Rolling back many migrations at once");
        }
        _ => {}
    }
}
