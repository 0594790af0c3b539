use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Secret used only by the development profile when none is configured.
const DEVELOPMENT_JWT_SECRET: &str = "development-only-secret-change-me";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub port: u16,
    pub default_page_size: i64,
    pub max_page_size: i64,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_minutes: i64,
    pub bcrypt_cost: u32,
    pub cors_origins: Vec<String>,
}

impl SecurityConfig {
    /// `*` (or an empty list) means any origin is accepted.
    pub fn cors_is_permissive(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup so tests never touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        };

        config.with_overrides(&lookup)
    }

    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Database overrides
        self.database.url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse("DATABASE_CONNECTION_TIMEOUT", &v)?;
        }
        if let Some(v) = lookup("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = parse("DATABASE_RUN_MIGRATIONS", &v)?;
        }

        // API overrides
        if let Some(v) = lookup("API_BIND_ADDR") {
            self.api.bind_addr = v;
        }
        if let Some(v) = lookup("API_PORT").or_else(|| lookup("PORT")) {
            self.api.port = parse("API_PORT", &v)?;
        }
        if let Some(v) = lookup("API_DEFAULT_PAGE_SIZE") {
            self.api.default_page_size = parse("API_DEFAULT_PAGE_SIZE", &v)?;
        }
        if let Some(v) = lookup("API_MAX_PAGE_SIZE") {
            self.api.max_page_size = parse("API_MAX_PAGE_SIZE", &v)?;
        }
        if let Some(v) = lookup("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = parse("API_MAX_REQUEST_SIZE_BYTES", &v)?;
        }
        if self.api.default_page_size < 1 || self.api.max_page_size < self.api.default_page_size {
            return Err(ConfigError::Invalid {
                key: "API_MAX_PAGE_SIZE",
                value: format!(
                    "default {} must be >= 1 and <= max {}",
                    self.api.default_page_size, self.api.max_page_size
                ),
            });
        }

        // Security overrides
        match lookup("SECURITY_JWT_SECRET").filter(|v| !v.is_empty()) {
            Some(secret) => self.security.jwt_secret = secret,
            None if self.environment == Environment::Development => {
                tracing::warn!("SECURITY_JWT_SECRET not set, using the development signing key");
                self.security.jwt_secret = DEVELOPMENT_JWT_SECRET.to_string();
            }
            None => return Err(ConfigError::Missing("SECURITY_JWT_SECRET")),
        }
        if let Some(v) = lookup("SECURITY_JWT_EXPIRY_MINUTES") {
            self.security.jwt_expiry_minutes = parse("SECURITY_JWT_EXPIRY_MINUTES", &v)?;
        }
        if let Some(v) = lookup("SECURITY_BCRYPT_COST") {
            self.security.bcrypt_cost = parse("SECURITY_BCRYPT_COST", &v)?;
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        Ok(self)
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
                connection_timeout: 30,
                run_migrations: true,
            },
            api: ApiConfig {
                bind_addr: "0.0.0.0".to_string(),
                port: 8000,
                default_page_size: 20,
                max_page_size: 1000,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_minutes: 120,
                bcrypt_cost: bcrypt::DEFAULT_COST,
                cors_origins: vec!["*".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 20,
                connection_timeout: 10,
                run_migrations: true,
            },
            api: ApiConfig {
                bind_addr: "0.0.0.0".to_string(),
                port: 8000,
                default_page_size: 20,
                max_page_size: 500,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_minutes: 120,
                bcrypt_cost: bcrypt::DEFAULT_COST,
                cors_origins: vec!["*".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 50,
                connection_timeout: 5,
                run_migrations: false,
            },
            api: ApiConfig {
                bind_addr: "0.0.0.0".to_string(),
                port: 8000,
                default_page_size: 20,
                max_page_size: 100,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_minutes: 120,
                bcrypt_cost: bcrypt::DEFAULT_COST,
                cors_origins: vec!["*".to_string()],
            },
        }
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}
