use anyhow::Context;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::books_repository::PostgresBooksRepositoryConfig;

const CONFIG_FILE_NAME: &str = "bookservice";
const ENV_PREFIX: &str = "BOOKSERVICE";

/// Startup configuration of the catalog server.
///
/// Values are layered: built-in defaults, optional `bookservice.toml`
/// in the working directory, then `BOOKSERVICE_*` environment variables
/// (e.g. `BOOKSERVICE_DB_HOST`).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub use_in_memory_db: bool,
    pub db_host: String,
    pub db_username: String,
    pub db_password: String,
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name(CONFIG_FILE_NAME).required(false))
                .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true)),
        )
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
        builder
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("use_in_memory_db", false)?
            .set_default("db_host", "127.0.0.1")?
            .set_default("db_username", "postgres")?
            .set_default("db_password", "postgres")?
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn postgres_config(&self) -> PostgresBooksRepositoryConfig {
        PostgresBooksRepositoryConfig {
            hostname: self.db_host.clone(),
            username: self.db_username.clone(),
            password: self.db_password.clone(),
        }
    }
}

#[cfg(test)]
mod settings_tests {
    use config::Config;

    use crate::settings::Settings;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_builder(Config::builder()).expect("Failed to load settings");

        assert_eq!(
            settings,
            Settings {
                host: "0.0.0.0".to_string(),
                port: 8080,
                use_in_memory_db: false,
                db_host: "127.0.0.1".to_string(),
                db_username: "postgres".to_string(),
                db_password: "postgres".to_string(),
            }
        );
    }

    #[test]
    fn test_overrides_take_precedence_over_defaults() {
        let builder = Config::builder()
            .set_override("port", 9000)
            .unwrap()
            .set_override("use_in_memory_db", true)
            .unwrap()
            .set_override("db_host", "db.internal:5433")
            .unwrap();

        let settings = Settings::from_builder(builder).expect("Failed to load settings");

        assert_eq!(settings.port, 9000);
        assert!(settings.use_in_memory_db);
        assert_eq!(settings.postgres_config().hostname, "db.internal:5433");
        assert_eq!(settings.postgres_config().username, "postgres");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let builder = Config::builder()
            .set_override("port", "not a port")
            .unwrap();

        assert!(Settings::from_builder(builder).is_err());
    }
}
