//! Application configuration loaded from a YAML file.
//!
//! # Environment overrides
//!
//! Applied after the file is parsed; a `.env` file is honored if present.
//! - `POSTGRES_USER`, `POSTGRES_PASSWORD`, `POSTGRES_DB`
//! - `JWT_SIGN` - token signing secret

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

use pvz_observability::LoggingConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config must be in yaml format: {0}")]
    MustBeYaml(PathBuf),
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config value {0}: {1}")]
    Invalid(&'static str, String),
}

fn secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub postgres: PostgresConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080 }
    }
}

impl HttpConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(deserialize_with = "secret")]
    pub password: SecretString,
    pub db: String,
    pub connect_attempts: u32,
    pub connect_timeout_secs: u64,
    pub max_connections: u32,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: empty_secret(),
            db: "pvz".to_string(),
            connect_attempts: 5,
            connect_timeout_secs: 5,
            max_connections: 10,
        }
    }
}

impl PostgresConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(self.password.expose_secret())
            .database(&self.db)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    pub jwt: JwtConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct JwtConfig {
    pub token_ttl_secs: i64,
    #[serde(deserialize_with = "secret", default = "empty_secret")]
    pub sign: SecretString,
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

fn default_issuer() -> String {
    "pvz".to_string()
}

/// One year; tokens living longer than that are a misconfiguration.
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

impl JwtConfig {
    /// Clamped to `1..=MAX_TOKEN_TTL_SECS`, so an unvalidated value cannot
    /// overflow token timestamps.
    pub fn token_ttl(&self) -> chrono::Duration {
        let secs = self.token_ttl_secs.clamp(1, MAX_TOKEN_TTL_SECS);
        chrono::Duration::try_seconds(secs).unwrap_or(chrono::Duration::seconds(MAX_TOKEN_TTL_SECS))
    }
}

impl AppConfig {
    /// Load from `path`, then apply environment overrides and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        if !is_yaml {
            return Err(ConfigError::MustBeYaml(path.to_path_buf()));
        }

        let _ = dotenvy::dotenv();

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_yaml_str(&raw)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(user) = lookup("POSTGRES_USER") {
            self.postgres.user = user;
        }
        if let Some(password) = lookup("POSTGRES_PASSWORD") {
            self.postgres.password = SecretString::from(password);
        }
        if let Some(db) = lookup("POSTGRES_DB") {
            self.postgres.db = db;
        }
        if let Some(sign) = lookup("JWT_SIGN") {
            self.auth.jwt.sign = SecretString::from(sign);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt.sign.expose_secret().is_empty() {
            return Err(ConfigError::Invalid("auth.jwt.sign", "must not be empty".to_string()));
        }
        let ttl = self.auth.jwt.token_ttl_secs;
        if ttl <= 0 || ttl > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::Invalid(
                "auth.jwt.token-ttl-secs",
                format!("must be within 1..={MAX_TOKEN_TTL_SECS}, got {ttl}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pvz_observability::LogFormat;

    use super::*;

    const FULL: &str = r#"
http:
  host: 127.0.0.1
  port: 9000
storage:
  backend: postgres
postgres:
  host: db
  port: 5433
  user: pvz
  password: hunter2
  db: pvz_test
  connect-attempts: 3
  connect-timeout-secs: 2
  max-connections: 4
auth:
  jwt:
    token-ttl-secs: 3600
    sign: s3cr3t
    issuer: pvz-service
logging:
  level: debug
  format: pretty
"#;

    #[test]
    fn parses_full_file() {
        let config = AppConfig::from_yaml_str(FULL).unwrap();

        assert_eq!(config.http.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.postgres.user, "pvz");
        assert_eq!(config.postgres.password.expose_secret(), "hunter2");
        assert_eq!(config.postgres.connect_attempts, 3);
        assert_eq!(config.postgres.connect_timeout(), Duration::from_secs(2));
        assert_eq!(config.auth.jwt.token_ttl(), chrono::Duration::hours(1));
        assert_eq!(config.auth.jwt.issuer, "pvz-service");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn sections_default_when_absent() {
        let config = AppConfig::from_yaml_str("auth:\n  jwt:\n    token-ttl-secs: 60\n    sign: x\n").unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.postgres.port, 5432);
        assert_eq!(config.auth.jwt.issuer, "pvz");
    }

    #[test]
    fn environment_overrides_file() {
        let mut config = AppConfig::from_yaml_str(FULL).unwrap();
        let env: HashMap<&str, &str> = [
            ("POSTGRES_USER", "env-user"),
            ("POSTGRES_PASSWORD", "env-pass"),
            ("POSTGRES_DB", "env-db"),
            ("JWT_SIGN", "env-sign"),
        ]
        .into_iter()
        .collect();

        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.postgres.user, "env-user");
        assert_eq!(config.postgres.password.expose_secret(), "env-pass");
        assert_eq!(config.postgres.db, "env-db");
        assert_eq!(config.auth.jwt.sign.expose_secret(), "env-sign");
    }

    #[test]
    fn rejects_missing_sign_and_bad_ttl() {
        let config = AppConfig::from_yaml_str("auth:\n  jwt:\n    token-ttl-secs: 60\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid("auth.jwt.sign", _))));

        let config = AppConfig::from_yaml_str("auth:\n  jwt:\n    token-ttl-secs: 0\n    sign: x\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid("auth.jwt.token-ttl-secs", _))
        ));
    }

    #[test]
    fn huge_ttl_is_rejected_and_never_panics() {
        let raw = format!("auth:\n  jwt:\n    token-ttl-secs: {}\n    sign: x\n", i64::MAX);
        let config = AppConfig::from_yaml_str(&raw).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid("auth.jwt.token-ttl-secs", _))
        ));
        assert_eq!(config.auth.jwt.token_ttl(), chrono::Duration::seconds(MAX_TOKEN_TTL_SECS));

        let raw = format!("auth:\n  jwt:\n    token-ttl-secs: {MAX_TOKEN_TTL_SECS}\n    sign: x\n");
        assert!(AppConfig::from_yaml_str(&raw).unwrap().validate().is_ok());
    }

    #[test]
    fn non_yaml_path_is_rejected() {
        assert!(matches!(AppConfig::load("config.json"), Err(ConfigError::MustBeYaml(_))));
        assert!(matches!(AppConfig::load("config"), Err(ConfigError::MustBeYaml(_))));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = AppConfig::from_yaml_str(FULL).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("s3cr3t"));
    }
}
