use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Process-wide settings, loaded once at startup and handed to whatever needs them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub avatar: AvatarConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    /// Seconds to wait when acquiring a pooled connection.
    pub connection_timeout: u64,
    /// Upper bound on a single store call made while handling a request.
    pub operation_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_secs: u64,
    pub bcrypt_cost: u32,
    pub cors_origins: Vec<String>,
}

/// Query parameters sent to the avatar service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarConfig {
    pub size: u32,
    pub rating: String,
    pub default_image: String,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            size: 200,
            rating: "pg".to_string(),
            default_image: "mm".to_string(),
        }
    }
}

impl DatabaseConfig {
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. `from_env` is this
    /// with the process environment plugged in.
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
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(&lookup)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // API overrides
        if let Some(v) = lookup("SIGNUP_API_PORT") {
            self.api.port = parse("SIGNUP_API_PORT", v)?;
        } else if let Some(v) = lookup("PORT") {
            self.api.port = parse("PORT", v)?;
        }
        if let Some(v) = lookup("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = parse("API_ENABLE_REQUEST_LOGGING", v)?;
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = Some(v).filter(|url| !url.trim().is_empty());
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse("DATABASE_MAX_CONNECTIONS", v)?;
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse("DATABASE_CONNECTION_TIMEOUT", v)?;
        }
        if let Some(v) = lookup("DATABASE_OPERATION_TIMEOUT_MS") {
            self.database.operation_timeout_ms = parse("DATABASE_OPERATION_TIMEOUT_MS", v)?;
        }

        // Security overrides
        if let Some(v) = lookup("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = lookup("SECURITY_JWT_EXPIRY_SECS") {
            self.security.jwt_expiry_secs = parse("SECURITY_JWT_EXPIRY_SECS", v)?;
        }
        if let Some(v) = lookup("SECURITY_BCRYPT_COST") {
            let cost: u32 = parse("SECURITY_BCRYPT_COST", v.clone())?;
            // bcrypt only accepts costs in 4..=31
            if !(4..=31).contains(&cost) {
                return Err(ConfigError::Invalid { key: "SECURITY_BCRYPT_COST", value: v });
            }
            self.security.bcrypt_cost = cost;
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Avatar overrides
        if let Some(v) = lookup("AVATAR_SIZE") {
            self.avatar.size = parse("AVATAR_SIZE", v)?;
        }
        if let Some(v) = lookup("AVATAR_RATING") {
            self.avatar.rating = v;
        }
        if let Some(v) = lookup("AVATAR_DEFAULT") {
            self.avatar.default_image = v;
        }

        Ok(self)
    }

    /// Fails when the config cannot sign tokens.
    pub fn require_signing_secret(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        Ok(())
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                port: 5000,
                enable_request_logging: true,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
                operation_timeout_ms: 10_000,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_secs: 36_000, // 10 hours
                bcrypt_cost: 10,
                cors_origins: vec!["http://localhost:3000".to_string()],
            },
            avatar: AvatarConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                port: 5000,
                enable_request_logging: true,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
                operation_timeout_ms: 5_000,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_secs: 36_000,
                bcrypt_cost: 10,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            avatar: AvatarConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                port: 5000,
                enable_request_logging: false,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
                operation_timeout_ms: 5_000,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_secs: 36_000,
                bcrypt_cost: 10,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            avatar: AvatarConfig::default(),
        }
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.security.jwt_expiry_secs, 36_000);
        assert_eq!(config.security.bcrypt_cost, 10);
        assert_eq!(config.avatar, AvatarConfig::default());
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::from_lookup(lookup_from(&[("APP_ENV", "prod")])).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert!(!config.api.enable_request_logging);
        assert_eq!(config.database.max_connections, 50);
    }

    #[test]
    fn env_overrides_win_over_presets() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("JWT_SECRET", "s3cret"),
            ("SECURITY_JWT_EXPIRY_SECS", "3600"),
            ("SECURITY_BCRYPT_COST", "12"),
            ("SECURITY_CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("AVATAR_SIZE", "80"),
        ]))
        .unwrap();

        assert_eq!(config.api.port, 8080);
        assert_eq!(config.security.jwt_secret, "s3cret");
        assert_eq!(config.security.jwt_expiry_secs, 3600);
        assert_eq!(config.security.bcrypt_cost, 12);
        assert_eq!(
            config.security.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(config.avatar.size, 80);
        assert_eq!(config.avatar.rating, "pg");
    }

    #[test]
    fn service_specific_port_beats_generic_port() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("SIGNUP_API_PORT", "7000"),
            ("PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(config.api.port, 7000);
    }

    #[test]
    fn rejects_unparseable_and_out_of_range_values() {
        let err = AppConfig::from_lookup(lookup_from(&[("PORT", "not-a-port")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));

        let err = AppConfig::from_lookup(lookup_from(&[("SIGNUP_API_PORT", "70000")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SIGNUP_API_PORT", .. }));

        let err = AppConfig::from_lookup(lookup_from(&[("SECURITY_BCRYPT_COST", "2")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SECURITY_BCRYPT_COST", .. }));
    }

    #[test]
    fn blank_database_url_means_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "  ")])).unwrap();
        assert!(config.database.url.is_none());
    }

    #[test]
    fn signing_secret_is_required() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert!(matches!(
            config.require_signing_secret(),
            Err(ConfigError::Missing("JWT_SECRET"))
        ));

        let config = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "abc")])).unwrap();
        assert!(config.require_signing_secret().is_ok());
    }
}
