//! Command-line definition

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Environment as AppEnvironment;

/// Job board API server
#[derive(Parser, Debug)]
#[command(name = "careers-rs")]
#[command(about = "Job board API: companies, job posts, categories and applicants")]
#[command(long_about = "
careers-rs serves the job board REST API backed by PostgreSQL.

EXAMPLES:
    # Start the server with the layered configuration in ./config
    careers-rs serve

    # Bind to all interfaces on port 8080
    careers-rs serve --host 0.0.0.0 --port 8080

    # Use a single configuration file
    careers-rs --config /etc/careers/production.toml serve

    # Check the configuration without starting the server
    careers-rs serve --dry-run

    # Apply, preview or revert migrations
    careers-rs migrate
    careers-rs migrate --dry-run
    careers-rs migrate --rollback 2
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Load this TOML file instead of the layered `config/` directory
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Environment layer to load, overriding CAREERS_APP_ENV
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Log errors only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Address to bind, e.g. 127.0.0.1 or 0.0.0.0
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// TCP port, 1-65535
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level for this run; wins over --verbose and --quiet
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate the configuration and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Apply or revert database migrations
    Migrate {
        /// List pending migrations without applying them
        #[arg(long, conflicts_with = "rollback")]
        dry_run: bool,

        /// Revert the given number of most recent migrations (1-100)
        #[arg(long, value_name = "STEPS", value_parser = super::validation::validate_rollback_steps)]
        rollback: Option<u32>,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Serve {
            host: None,
            port: None,
            log_level: None,
            dry_run: false,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

impl From<Environment> for AppEnvironment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => AppEnvironment::Development,
            Environment::Test => AppEnvironment::Test,
            Environment::Staging => AppEnvironment::Staging,
            Environment::Production => AppEnvironment::Production,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    #[value(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Cli {
    /// The subcommand to run; no subcommand means `serve`.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or_default()
    }

    /// Environment from `--env`, falling back to `CAREERS_APP_ENV`
    pub fn environment(&self) -> AppEnvironment {
        self.env
            .map(AppEnvironment::from)
            .unwrap_or_else(AppEnvironment::from_env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        <Cli as CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_help_and_version() {
        let err = Cli::try_parse_from(["careers-rs", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);

        let err = Cli::try_parse_from(["careers-rs", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["careers-rs"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.command(), Commands::default());
        assert!(matches!(cli.command(), Commands::Serve { dry_run: false, .. }));
    }

    #[test]
    fn test_serve_arguments() {
        let cli = Cli::try_parse_from([
            "careers-rs",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--log-level",
            "warning",
        ])
        .unwrap();

        assert_eq!(
            cli.command(),
            Commands::Serve {
                host: Some("0.0.0.0".to_string()),
                port: Some(8080),
                log_level: Some(LogLevel::Warn),
                dry_run: false,
            }
        );
    }

    #[test]
    fn test_migrate_arguments() {
        let cli = Cli::try_parse_from(["careers-rs", "migrate", "--rollback", "2"]).unwrap();
        assert_eq!(
            cli.command(),
            Commands::Migrate {
                dry_run: false,
                rollback: Some(2),
            }
        );

        let err =
            Cli::try_parse_from(["careers-rs", "migrate", "--dry-run", "--rollback", "1"])
                .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Cli::try_parse_from(["careers-rs", "serve", "--port", "0"]).is_err());
        assert!(Cli::try_parse_from(["careers-rs", "migrate", "--rollback", "0"]).is_err());
        assert!(Cli::try_parse_from(["careers-rs", "--verbose", "--quiet"]).is_err());
    }

    #[test]
    fn test_env_flag_aliases() {
        let cli = Cli::try_parse_from(["careers-rs", "--env", "prod"]).unwrap();
        assert_eq!(cli.environment(), AppEnvironment::Production);
    }
}
