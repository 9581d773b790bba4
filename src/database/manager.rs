use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::store::StoreError;

/// Builds the PostgreSQL pool the API runs on
pub struct DatabaseManager;

impl DatabaseManager {
    /// Connect a pool using the configured URL and limits
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, StoreError> {
        let connection_string = Self::build_connection_string(config)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&connection_string)
            .await?;

        info!(
            "Created database pool (max_connections={}) for: {}",
            config.max_connections,
            Self::redacted(&connection_string)
        );
        Ok(pool)
    }

    /// Apply embedded schema migrations
    pub async fn migrate(pool: &PgPool) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Resolve the connection string, swapping in `name` as the database path when set
    fn build_connection_string(config: &DatabaseConfig) -> Result<String, StoreError> {
        let base = config
            .url
            .as_deref()
            .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;

        let mut url = url::Url::parse(base)
            .map_err(|_| StoreError::Validation("Invalid DATABASE_URL".to_string()))?;

        if let Some(name) = config.name.as_deref() {
            if !Self::is_valid_db_name(name) {
                return Err(StoreError::Validation(format!("Invalid database name: {}", name)));
            }
            url.set_path(&format!("/{}", name));
        }
        Ok(url.into())
    }

    /// Connection string with the password masked, for logs
    fn redacted(connection_string: &str) -> String {
        match url::Url::parse(connection_string) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("***"));
                }
                url.into()
            }
            Err(_) => "<invalid url>".to_string(),
        }
    }

    fn is_valid_db_name(name: &str) -> bool {
        !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}
