//! Layered configuration loading.
//!
//! Sources, lowest precedence first: `default.toml` (required), the
//! environment's `{env}.toml`, `local.toml`, then `CAREERS_*` variables
//! with `__` between nested keys (`CAREERS_SERVER__PORT` sets `server.port`).
//! A single file set by `CAREERS_CONFIG_FILE` or `--config` replaces the
//! three file layers.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

const CONFIG_DIR_ENV: &str = "CAREERS_CONFIG_DIR";
const CONFIG_FILE_ENV: &str = "CAREERS_CONFIG_FILE";
const DEFAULT_CONFIG_DIR: &str = "config";
const ENV_PREFIX: &str = "CAREERS";
const ENV_SEPARATOR: &str = "__";

type Builder = ConfigBuilder<DefaultState>;

#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Reads the directory, file and environment selectors from the process
    /// environment. Setting both `CAREERS_CONFIG_DIR` and
    /// `CAREERS_CONFIG_FILE` is an error.
    pub fn new() -> Result<Self, ConfigError> {
        let dir_var = std::env::var(CONFIG_DIR_ENV).ok();
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if dir_var.is_some() && config_file.is_some() {
            return Err(ConfigError::mutual_exclusivity(format!(
                "{} and {} cannot both be set",
                CONFIG_DIR_ENV, CONFIG_FILE_ENV
            )));
        }

        Ok(Self {
            config_dir: PathBuf::from(dir_var.as_deref().unwrap_or(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Load only `path`, skipping the layered directory lookup
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Select the environment layer explicitly instead of `CAREERS_APP_ENV`
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Merges every source, deserializes and validates the result.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let settings: Settings = self.build_config()?.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let mut builder = Config::builder();
        for (path, required) in self.file_layers() {
            builder = add_file_source(builder, &path, required)?;
        }
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()
            .map_err(ConfigError::from)
    }

    /// TOML files to merge in order, each with whether it must exist.
    fn file_layers(&self) -> Vec<(PathBuf, bool)> {
        if let Some(file) = &self.config_file {
            return vec![(file.clone(), true)];
        }
        vec![
            (self.config_dir.join("default.toml"), true),
            (
                self.config_dir
                    .join(format!("{}.toml", self.environment.as_str())),
                false,
            ),
            (self.config_dir.join("local.toml"), false),
        ]
    }
}

fn add_file_source(builder: Builder, path: &Path, required: bool) -> Result<Builder, ConfigError> {
    if required && !path.exists() {
        return Err(ConfigError::file_not_found(format!(
            "Required configuration file not found: {}",
            path.display()
        )));
    }
    Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(required)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Tests touching process env vars must not interleave
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    const DEFAULT_TOML: &str = r#"
[application]
name = "careers-test"

[server]
host = "127.0.0.1"
port = 3000

[database]
url = "postgres://localhost/careers_test"
max_connections = 10

[jwt]
secret = "test-secret-that-is-long-enough-for-hs256"

[storage]
backend = "disabled"
"#;

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
        }
        temp_dir
    }

    /// Sets env vars for one test and restores the previous values on drop
    struct EnvGuard {
        vars_to_restore: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new() -> Self {
            Self {
                vars_to_restore: Vec::new(),
            }
        }

        fn set(&mut self, key: &str, value: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        fn remove(&mut self, key: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::remove_var(key);
            }
        }

        fn use_dir(&mut self, dir: &TempDir) {
            self.set(CONFIG_DIR_ENV, dir.path().to_str().unwrap());
            self.remove(CONFIG_FILE_ENV);
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, original_value) in self.vars_to_restore.iter().rev() {
                unsafe {
                    match original_value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    #[test]
    fn test_new_uses_defaults() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        env.remove(CONFIG_DIR_ENV);
        env.remove(CONFIG_FILE_ENV);
        env.remove(AppEnvironment::ENV_VAR);

        let loader = ConfigLoader::new().unwrap();
        assert_eq!(loader.config_dir, PathBuf::from("config"));
        assert!(loader.config_file.is_none());
        assert_eq!(loader.environment(), AppEnvironment::Development);
    }

    #[test]
    fn test_file_layers_follow_environment() {
        let loader = ConfigLoader {
            config_dir: PathBuf::from("/etc/careers"),
            config_file: None,
            environment: AppEnvironment::Production,
        };
        assert_eq!(
            loader.file_layers(),
            vec![
                (PathBuf::from("/etc/careers/default.toml"), true),
                (PathBuf::from("/etc/careers/production.toml"), false),
                (PathBuf::from("/etc/careers/local.toml"), false),
            ]
        );

        let single = loader.with_config_file("/srv/careers.toml");
        assert_eq!(
            single.file_layers(),
            vec![(PathBuf::from("/srv/careers.toml"), true)]
        );
    }

    #[test]
    fn test_dir_and_file_are_mutually_exclusive() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        env.set(CONFIG_DIR_ENV, "/custom/config");
        env.set(CONFIG_FILE_ENV, "/path/to/careers.toml");

        match ConfigLoader::new() {
            Err(ConfigError::MutualExclusivityError(msg)) => {
                assert!(msg.contains("CAREERS_CONFIG_DIR"));
                assert!(msg.contains("CAREERS_CONFIG_FILE"));
            }
            other => panic!("Expected MutualExclusivityError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_default_toml() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        let temp_dir = setup_config_dir(&[]);
        env.use_dir(&temp_dir);
        env.remove(AppEnvironment::ENV_VAR);

        match ConfigLoader::new().unwrap().load() {
            Err(ConfigError::FileNotFound(msg)) => assert!(msg.contains("default.toml")),
            other => panic!("Expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_layer_precedence() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_TOML),
            (
                "production.toml",
                "[server]\nhost = \"0.0.0.0\"\nport = 8080\n\n[database]\nmax_connections = 50\n",
            ),
            ("local.toml", "[server]\nport = 9090\n"),
        ]);
        env.use_dir(&temp_dir);
        env.set(AppEnvironment::ENV_VAR, "prod");
        env.set("CAREERS_DATABASE__MIN_CONNECTIONS", "5");
        env.set("CAREERS_STORAGE__MAX_FILE_SIZE", "1048576");

        let settings = ConfigLoader::new().unwrap().load().unwrap();

        assert_eq!(settings.application.name, "careers-test");
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.database.max_connections, 50);
        assert_eq!(settings.database.min_connections, 5);
        assert_eq!(settings.storage.max_file_size, 1_048_576);
    }

    #[test]
    fn test_single_file_mode() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        let temp_dir = setup_config_dir(&[
            ("careers.toml", DEFAULT_TOML),
            ("development.toml", "[server]\nport = 1234\n"),
        ]);
        env.remove(CONFIG_DIR_ENV);
        env.set(
            CONFIG_FILE_ENV,
            temp_dir.path().join("careers.toml").to_str().unwrap(),
        );
        env.remove(AppEnvironment::ENV_VAR);

        let settings = ConfigLoader::new().unwrap().load().unwrap();
        assert_eq!(settings.server.port, 3000);
    }

    #[test]
    fn test_explicit_file_and_environment() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_TOML),
            ("staging.toml", "[server]\nport = 4100\n"),
            ("other.toml", &DEFAULT_TOML.replace("port = 3000", "port = 4200")),
        ]);
        env.use_dir(&temp_dir);
        env.remove(AppEnvironment::ENV_VAR);

        let loader = ConfigLoader::new()
            .unwrap()
            .with_environment(AppEnvironment::Staging);
        assert_eq!(loader.environment(), AppEnvironment::Staging);
        assert_eq!(loader.load().unwrap().server.port, 4100);

        let settings = ConfigLoader::new()
            .unwrap()
            .with_config_file(temp_dir.path().join("other.toml"))
            .load()
            .unwrap();
        assert_eq!(settings.server.port, 4200);
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_TOML)]);
        env.use_dir(&temp_dir);
        env.remove(AppEnvironment::ENV_VAR);
        env.set("CAREERS_JWT__SECRET", "short");

        match ConfigLoader::new().unwrap().load() {
            Err(ConfigError::ValidationError { field, .. }) => assert_eq!(field, "jwt.secret"),
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }
}
