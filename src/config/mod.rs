use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Tokens are valid for one hour from issuance
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set to a non-empty value")]
    MissingSecret,

    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    /// Empty means any origin is allowed
    pub cors_origins: Vec<String>,
    pub password_memory_kib: u32,
    pub password_iterations: u32,
}

impl AppConfig {
    /// Build configuration from the process environment.
    ///
    /// Refuses to produce a config without a signing secret; there is no
    /// built-in fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let secret = env::var("JWT_SECRET").unwrap_or_default();
        if secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }

        Self::preset(environment, secret).with_env_overrides()
    }

    /// Preset for the given environment with an explicit secret
    pub fn preset(environment: Environment, jwt_secret: impl Into<String>) -> Self {
        let mut config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        };
        config.security.jwt_secret = jwt_secret.into();
        config
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Some(v) = parse_var("PORT")? {
            self.server.port = v;
        }
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }

        if let Ok(v) = env::var("DATABASE_PATH") {
            self.database.path = v;
        }
        if let Some(v) = parse_var("DATABASE_MAX_CONNECTIONS")? {
            self.database.max_connections = v;
        }

        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(v) = parse_var("SECURITY_PASSWORD_MEMORY_KIB")? {
            self.security.password_memory_kib = v;
        }
        if let Some(v) = parse_var("SECURITY_PASSWORD_ITERATIONS")? {
            self.security.password_iterations = v;
        }

        Ok(self)
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                path: "notesapp.db".to_string(),
                max_connections: 1,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                token_ttl_secs: TOKEN_TTL_SECS,
                cors_origins: Vec::new(),
                password_memory_kib: 65536, // 64 MiB
                password_iterations: 3,
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config
    }

    fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.server.host = "127.0.0.1".to_string();
        config
    }
}

fn parse_var<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(None),
    }
}
