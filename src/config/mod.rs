use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub store: StoreKind,
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

/// Which journal store backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    /// Overrides the database name in `url` when set
    pub name: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    /// Expected `aud` claim; unchecked when `None`
    pub jwt_audience: Option<String>,
    pub dev_token_expiry_hours: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build config from an arbitrary variable source
    pub fn from_vars<F>(lookup: F) -> Self
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
        .with_overrides(lookup)
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DAYPAT_STORE") {
            match v.to_ascii_lowercase().as_str() {
                "memory" | "mem" => self.store = StoreKind::Memory,
                "postgres" | "pg" => self.store = StoreKind::Postgres,
                other => tracing::warn!("Ignoring unknown DAYPAT_STORE value '{}'", other),
            }
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Some(v) = lookup("DATABASE_NAME") {
            self.database.name = Some(v);
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout =
                v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Some(v) = lookup("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = v.parse().unwrap_or(self.database.run_migrations);
        }

        // API overrides
        if let Some(port) = lookup("DAYPAT_API_PORT")
            .or_else(|| lookup("PORT"))
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Some(v) = lookup("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Some(v) = lookup("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Some(v) = lookup("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(v) = lookup("DAYPAT_JWT_SECRET").or_else(|| lookup("JWT_SECRET")) {
            self.security.jwt_secret = v;
        }
        if let Some(v) = lookup("DAYPAT_JWT_AUDIENCE") {
            self.security.jwt_audience = if v.trim().is_empty() { None } else { Some(v) };
        }
        if let Some(v) = lookup("SECURITY_DEV_TOKEN_EXPIRY_HOURS") {
            self.security.dev_token_expiry_hours =
                v.parse().unwrap_or(self.security.dev_token_expiry_hours);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            store: StoreKind::Memory,
            database: DatabaseConfig {
                url: None,
                name: None,
                max_connections: 5,
                connection_timeout: 30,
                run_migrations: true,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
                jwt_secret: String::new(),
                jwt_audience: Some("authenticated".to_string()),
                dev_token_expiry_hours: 24 * 7, // 1 week
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            store: StoreKind::Postgres,
            database: DatabaseConfig {
                url: None,
                name: None,
                max_connections: 10,
                connection_timeout: 10,
                run_migrations: true,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.daypat.app".to_string()],
                jwt_secret: String::new(),
                jwt_audience: Some("authenticated".to_string()),
                dev_token_expiry_hours: 24,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            store: StoreKind::Postgres,
            database: DatabaseConfig {
                url: None,
                name: None,
                max_connections: 20,
                connection_timeout: 5,
                run_migrations: false,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: false,
                max_request_size_bytes: 512 * 1024, // 512KB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://daypat.app".to_string()],
                jwt_secret: String::new(),
                jwt_audience: Some("authenticated".to_string()),
                dev_token_expiry_hours: 1,
            },
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::from_vars(vars(&[]));
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.api.port, 3000);
        assert!(config.database.run_migrations);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::from_vars(vars(&[("APP_ENV", "prod")]));
        assert_eq!(config.store, StoreKind::Postgres);
        assert!(!config.database.run_migrations);
        assert!(!config.api.enable_request_logging);
    }

    #[test]
    fn env_overrides_apply_on_top_of_presets() {
        let config = AppConfig::from_vars(vars(&[
            ("APP_ENV", "production"),
            ("DAYPAT_STORE", "memory"),
            ("PORT", "8080"),
            ("DAYPAT_JWT_SECRET", "s3cret"),
            ("DAYPAT_JWT_AUDIENCE", ""),
            ("SECURITY_CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("DATABASE_MAX_CONNECTIONS", "not-a-number"),
        ]));
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.security.jwt_secret, "s3cret");
        assert_eq!(config.security.jwt_audience, None);
        assert_eq!(config.security.cors_origins, ["https://a.example", "https://b.example"]);
        assert_eq!(config.database.max_connections, 20);
    }

    #[test]
    fn daypat_port_wins_over_port() {
        let config = AppConfig::from_vars(vars(&[("DAYPAT_API_PORT", "4100"), ("PORT", "8080")]));
        assert_eq!(config.api.port, 4100);
    }
}
