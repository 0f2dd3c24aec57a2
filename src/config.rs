//! Server configuration read from the environment (and `.env`).

use std::env;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("invalid value `{value}` for {name}")]
    Invalid { name: &'static str, value: String },
}

/// Settings needed to start the admin server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Cookie signing secret; a random key is generated when absent.
    pub secret: Option<String>,
    pub auth_service_url: String,
    /// Cookie domain shared with the auth service.
    pub domain: String,
    /// Directory receiving uploaded product images, served under `/uploads`.
    pub upload_dir: PathBuf,
    /// Directory holding the Roboto TTF files (regular, bold, italic and
    /// bold italic) used for PDF exports. Not shipped with the crate.
    pub fonts_dir: PathBuf,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = match var("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => 8080,
        };

        Ok(Self {
            database_url: var("DATABASE_URL").unwrap_or_else(|| "app.db".to_string()),
            address: var("ADDRESS").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            secret: var("SECRET_KEY"),
            auth_service_url: var("AUTH_SERVICE_URL")
                .ok_or(ConfigError::Missing("AUTH_SERVICE_URL"))?,
            domain: var("DOMAIN").unwrap_or_else(|| "localhost".to_string()),
            upload_dir: var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./uploads")),
            fonts_dir: var("FONTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./fonts")),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_auth_url_is_set() {
        let config = config(&[("AUTH_SERVICE_URL", "https://auth.example.com")]).expect("config");

        assert_eq!(config.database_url, "app.db");
        assert_eq!(config.port, 8080);
        assert_eq!(config.secret, None);
        assert_eq!(config.upload_dir, PathBuf::from("./uploads"));
        assert_eq!(config.fonts_dir, PathBuf::from("./fonts"));
    }

    #[test]
    fn auth_url_is_required() {
        assert_eq!(
            config(&[("PORT", "9000")]),
            Err(ConfigError::Missing("AUTH_SERVICE_URL"))
        );
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(matches!(
            config(&[("AUTH_SERVICE_URL", "x"), ("PORT", "http")]),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));
    }
}
