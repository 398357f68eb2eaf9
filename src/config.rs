use std::env;

use anyhow::{Context, Result, anyhow};
use axum::http::HeaderValue;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_ALLOW_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub ssl_mode: PgSslMode,
    pub timezone: String,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(self.ssl_mode)
            .options([("TimeZone", self.timezone.as_str())])
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub allow_origin: HeaderValue,
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Loads `.env` when present and reads the process environment. A missing
    /// `.env` is not an error; one that fails to parse is.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(err) if err.not_found() => {}
            Err(err) => return Err(err).context("failed to load .env file"),
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| anyhow!("{key} must be set"))
        };

        let host = lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("SERVER_PORT").filter(|value| !value.is_empty()) {
            Some(raw) => raw
                .parse::<u16>()
                .context("SERVER_PORT must be a valid u16")?,
            None => DEFAULT_SERVER_PORT,
        };

        let allow_origin = lookup("ALLOW_ORIGIN")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_ALLOW_ORIGIN.to_string());
        let allow_origin = HeaderValue::from_str(&allow_origin)
            .context("ALLOW_ORIGIN must be a valid header value")?;

        let database = DatabaseConfig {
            host: required("DB_HOST")?,
            port: required("DB_PORT")?
                .parse::<u16>()
                .context("DB_PORT must be a valid u16")?,
            user: required("DB_USER")?,
            password: required("DB_PASSWORD")?,
            name: required("DB_NAME")?,
            max_connections: lookup("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "10".to_string())
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS must be a valid u32")?,
            ssl_mode: lookup("DB_SSLMODE")
                .unwrap_or_else(|| "disable".to_string())
                .parse::<PgSslMode>()
                .context("DB_SSLMODE must be a PostgreSQL sslmode")?,
            timezone: lookup("DB_TIMEZONE").unwrap_or_else(|| "Asia/Jakarta".to_string()),
        };

        Ok(Self {
            host,
            port,
            allow_origin,
            database,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const DATABASE_VARS: [(&str, &str); 5] = [
        ("DB_HOST", "localhost"),
        ("DB_USER", "erm"),
        ("DB_PASSWORD", "secret"),
        ("DB_NAME", "erm_db"),
        ("DB_PORT", "5432"),
    ];

    #[test]
    fn defaults_apply_when_optional_vars_are_missing() {
        let config = AppConfig::from_lookup(lookup_from(&DATABASE_VARS)).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.address(), "0.0.0.0:8080");
        assert_eq!(config.allow_origin, "http://localhost:3000");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.max_connections, 10);
        assert!(matches!(config.database.ssl_mode, PgSslMode::Disable));
        assert_eq!(config.database.timezone, "Asia/Jakarta");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let mut vars = DATABASE_VARS.to_vec();
        vars.extend([
            ("SERVER_PORT", "9090"),
            ("ALLOW_ORIGIN", "https://erm.example.org"),
            ("DB_SSLMODE", "require"),
        ]);
        let config = AppConfig::from_lookup(lookup_from(&vars)).unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.allow_origin, "https://erm.example.org");
        assert!(matches!(config.database.ssl_mode, PgSslMode::Require));
    }

    #[test]
    fn missing_database_variable_is_fatal() {
        for missing in DATABASE_VARS.map(|(key, _)| key) {
            let vars: Vec<_> = DATABASE_VARS
                .into_iter()
                .filter(|(key, _)| *key != missing)
                .collect();
            let err = AppConfig::from_lookup(lookup_from(&vars)).unwrap_err();
            assert_eq!(err.to_string(), format!("{missing} must be set"));
        }
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut vars = DATABASE_VARS.to_vec();
        vars.push(("SERVER_PORT", "eighty"));
        let err = AppConfig::from_lookup(lookup_from(&vars)).unwrap_err();
        assert_eq!(err.to_string(), "SERVER_PORT must be a valid u16");
    }
}
