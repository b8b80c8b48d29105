use crate::domain::error::{AppError, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

const CONFIG_FILE: &str = "lgd_mapper.toml";
const ENV_PREFIX: &str = "LGD_";

pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    pub database_path: PathBuf,
    #[validate(length(min = 1))]
    pub log_filter: String,
    /// Largest accepted request body
    #[validate(range(min = 1))]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            database_path: PathBuf::from("lgd_database.db"),
            log_filter: "info".to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

pub struct ConfigService {
    figment: Figment,
}

impl ConfigService {
    /// Defaults, then `lgd_mapper.toml` if present, then `LGD_*` variables.
    pub fn new() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_figment(
            Figment::from(Serialized::defaults(ServerConfig::default()))
                .merge(Toml::file(CONFIG_FILE))
                .merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn load(&self) -> Result<ServerConfig> {
        let config: ServerConfig = self
            .figment
            .extract()
            .map_err(|e| AppError::ConfigError(format!("Failed to load config: {}", e)))?;

        config
            .validate()
            .map_err(|e| AppError::ConfigError(format!("Invalid config: {}", e)))?;

        if config.database_path.as_os_str().is_empty() {
            return Err(AppError::ConfigError(
                "Invalid config: database_path must not be empty".to_string(),
            ));
        }

        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn service() -> ConfigService {
        ConfigService::from_figment(
            Figment::from(Serialized::defaults(ServerConfig::default()))
                .merge(Toml::file(CONFIG_FILE))
                .merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_jail| {
            let config = service().load().unwrap();
            assert_eq!(config.host, "127.0.0.1");
            assert_eq!(config.port, 5000);
            assert_eq!(config.database_path, PathBuf::from("lgd_database.db"));
            assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                port = 8080
                database_path = "data/lgd.db"
                "#,
            )?;
            jail.set_env("LGD_PORT", "9090");
            jail.set_env("LGD_MAX_BODY_BYTES", "1048576");

            let config = service().load().unwrap();
            assert_eq!(config.port, 9090);
            assert_eq!(config.max_body_bytes, 1_048_576);
            assert_eq!(config.database_path, PathBuf::from("data/lgd.db"));
            Ok(())
        });
    }

    #[test]
    fn test_zero_port_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("LGD_PORT", "0");
            let err = service().load().unwrap_err();
            assert!(matches!(err, AppError::ConfigError(_)));
            Ok(())
        });
    }

    #[test]
    fn test_empty_database_path_is_rejected() {
        let config = ServerConfig {
            database_path: PathBuf::new(),
            ..ServerConfig::default()
        };
        let err = ConfigService::from_figment(Figment::from(Serialized::defaults(config)))
            .load()
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }
}
