//! `serve` command

use crate::config::{Environment, Settings, StorageBackend};
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
    environment: Environment,
}

impl ServeCommandHandler {
    pub fn new(config: Settings, environment: Environment) -> Self {
        Self {
            config,
            environment,
        }
    }

    /// Starts the server, or with `dry_run` only validates and reports the
    /// effective configuration.
    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            for line in self.dry_run_report()? {
                println!("{}", line);
            }
            return Ok(());
        }

        Server::new(self.config, self.environment).run().await
    }

    /// Summary lines printed by `serve --dry-run`
    pub fn dry_run_report(&self) -> anyhow::Result<Vec<String>> {
        self.config.validate()?;

        let storage = match self.config.storage.backend {
            StorageBackend::S3 => format!("s3 bucket '{}'", self.config.storage.s3.bucket),
            StorageBackend::Local => {
                format!("local directory '{}'", self.config.storage.local.root_dir)
            }
            StorageBackend::Disabled => "disabled".to_string(),
        };

        Ok(vec![
            "✓ Configuration is valid".to_string(),
            format!("✓ Environment: {}", self.environment.as_str()),
            format!("✓ Server would bind to: {}", self.config.server.address()),
            format!(
                "✓ Database pool: {}-{} connections, auto-migrate {}",
                self.config.database.min_connections,
                self.config.database.max_connections,
                if self.config.database.auto_migrate { "on" } else { "off" }
            ),
            format!("✓ Image storage: {}", storage),
            format!("✓ Log level: {}", self.config.logger.level),
            "Dry run completed successfully".to_string(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/careers_test".to_string();
        config.jwt.secret = "0123456789abcdef0123456789abcdef".to_string();
        config
    }

    #[tokio::test]
    async fn test_dry_run_succeeds_without_database() {
        let handler = ServeCommandHandler::new(valid_config(), Environment::Test);
        assert!(handler.execute(true).await.is_ok());
    }

    #[test]
    fn test_dry_run_report() {
        let mut config = valid_config();
        config.storage.backend = StorageBackend::Disabled;
        let report = ServeCommandHandler::new(config, Environment::Production)
            .dry_run_report()
            .unwrap();

        assert!(report.contains(&"✓ Environment: production".to_string()));
        assert!(report.contains(&"✓ Server would bind to: 127.0.0.1:3000".to_string()));
        assert!(report.contains(&"✓ Image storage: disabled".to_string()));
    }

    #[tokio::test]
    async fn test_dry_run_rejects_invalid_config() {
        let mut config = valid_config();
        config.server.port = 0;
        let handler = ServeCommandHandler::new(config, Environment::Test);
        assert!(handler.execute(true).await.is_err());
    }
}
