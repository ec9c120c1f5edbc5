//! Configuration validation logic
//!
//! Each section checks its own values; `Settings::validate` reports the
//! first failure.

use url::Url;

use crate::config::error::ConfigError;
use crate::config::settings::{
    CorsConfig, DatabaseConfig, JwtConfig, ServerConfig, Settings, StorageBackend, StorageConfig,
};

/// Minimum length of the JWT signing secret
const MIN_JWT_SECRET_LENGTH: usize = 32;

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Request timeout must be greater than 0
    /// - Body limit must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.body_limit == 0 {
            return Err(ConfigError::validation(
                "server.body_limit",
                "Body limit must be greater than 0 bytes.",
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// Validate database configuration
    ///
    /// # Validation Rules
    /// - URL must be a `postgres://` or `postgresql://` connection string
    /// - Min and max connections must be greater than 0, min <= max
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                "Database URL is required. Please specify a valid database connection string.",
            ));
        }

        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ConfigError::validation(
                "database.url",
                "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections == 0 {
            return Err(ConfigError::validation(
                "database.min_connections",
                "Min connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::ValidationError {
                field: "database.min_connections".to_string(),
                message: format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            });
        }

        Ok(())
    }
}

impl JwtConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::ValidationError {
                field: "jwt.secret".to_string(),
                message: format!(
                    "JWT secret must be at least {} characters long.",
                    MIN_JWT_SECRET_LENGTH
                ),
            });
        }

        if self.access_token_expiration <= 0 {
            return Err(ConfigError::validation(
                "jwt.access_token_expiration",
                "Access token expiration must be greater than 0 hours.",
            ));
        }

        if self.refresh_token_expiration <= self.access_token_expiration {
            return Err(ConfigError::validation(
                "jwt.refresh_token_expiration",
                "Refresh token expiration must be longer than access token expiration.",
            ));
        }

        Ok(())
    }
}

impl StorageConfig {
    /// Validate storage configuration
    ///
    /// Only the section of the selected backend is checked.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_file_size == 0 {
            return Err(ConfigError::validation(
                "storage.max_file_size",
                "Max file size must be greater than 0 bytes.",
            ));
        }

        match self.backend {
            StorageBackend::S3 => {
                let s3 = &self.s3;
                for (field, value) in [
                    ("storage.s3.endpoint", &s3.endpoint),
                    ("storage.s3.region", &s3.region),
                    ("storage.s3.bucket", &s3.bucket),
                    ("storage.s3.access_key", &s3.access_key),
                    ("storage.s3.secret_key", &s3.secret_key),
                ] {
                    if value.trim().is_empty() {
                        return Err(ConfigError::validation(
                            field,
                            "Value is required when the s3 storage backend is selected.",
                        ));
                    }
                }
                check_http_url("storage.s3.endpoint", &s3.endpoint)?;
                if let Some(public_url) = &s3.public_url {
                    check_http_url("storage.s3.public_url", public_url)?;
                }
            }
            StorageBackend::Local => {
                if self.local.root_dir.trim().is_empty() {
                    return Err(ConfigError::validation(
                        "storage.local.root_dir",
                        "Root directory is required when the local storage backend is selected.",
                    ));
                }
                check_http_url("storage.local.public_url", &self.local.public_url)?;
            }
            StorageBackend::Disabled => {}
        }

        Ok(())
    }
}

impl CorsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for origin in &self.allowed_origins {
            check_http_url("cors.allowed_origins", origin)?;
        }
        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.jwt.validate()?;
        self.logger
            .validate()
            .map_err(|e| ConfigError::validation("logger".to_string(), e.to_string()))?;
        self.storage.validate()?;
        self.cors.validate()?;
        Ok(())
    }
}

fn check_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ConfigError::ValidationError {
            field: field.to_string(),
            message: format!("'{}' is not a valid http(s) URL.", value),
        }),
    }
}
