//! Database access layer
//!
//! sea-orm entities, migrations and the subscriptions DAO, which is also the
//! production implementation of [`SubscriptionRepository`].
//!
//! [`SubscriptionRepository`]: crate::subscription::SubscriptionRepository

use crate::database::config::DatabaseConfig;
use crate::health::HealthChecker;
use crate::subscription::SubscriptionError;
use async_trait::async_trait;
use sea_orm::{ConnectOptions, DatabaseConnection};
use thiserror::Error;

pub mod config;
pub mod dao;
pub mod entities;
pub mod migration;

pub use dao::SubscriptionsDao;

/// Database error types
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

impl From<DatabaseError> for SubscriptionError {
    fn from(err: DatabaseError) -> Self {
        SubscriptionError::Repository(err.to_string())
    }
}

/// Database manager trait for dependency injection and testing
#[async_trait]
pub trait DatabaseManager: Send + Sync {
    /// Run database migrations
    async fn migrate(&self) -> DatabaseResult<()>;

    /// Health check for database connection
    async fn health_check(&self) -> DatabaseResult<()>;

    /// Get subscriptions DAO
    fn subscriptions(&self) -> SubscriptionsDao;

    /// Get direct database connection (for migrations and admin operations)
    fn connection(&self) -> &DatabaseConnection;
}

/// Database connection manager implementation
pub struct DatabaseManagerImpl {
    pub connection: DatabaseConnection,
}

impl DatabaseManagerImpl {
    /// Create database manager from configuration
    pub async fn new_from_config(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let mut options = ConnectOptions::new(config.connection_url());
        options.sqlx_logging(false);

        // An in-memory SQLite database lives in a single connection; let
        // sea-orm keep its one-connection pool for SQLite.
        if !config.is_sqlite() {
            options.max_connections(config.max_connections);
        }

        let connection = sea_orm::Database::connect(options)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(Self { connection })
    }
}

#[async_trait]
impl DatabaseManager for DatabaseManagerImpl {
    async fn migrate(&self) -> DatabaseResult<()> {
        use crate::database::migration::Migrator;
        use sea_orm_migration::MigratorTrait;

        tracing::info!("Running database migrations");

        Migrator::up(&self.connection, None)
            .await
            .map_err(|e| DatabaseError::Migration(format!("Failed to run migrations: {}", e)))?;

        tracing::info!("Successfully completed all migrations");
        Ok(())
    }

    async fn health_check(&self) -> DatabaseResult<()> {
        self.connection
            .ping()
            .await
            .map_err(|e| DatabaseError::Database(format!("db error: {}", e)))
    }

    fn subscriptions(&self) -> SubscriptionsDao {
        SubscriptionsDao::new(self.connection.clone())
    }

    fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}

#[async_trait]
impl HealthChecker for DatabaseManagerImpl {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> crate::health::HealthCheckResult {
        match self.health_check().await {
            Ok(_) => crate::health::HealthCheckResult::healthy_with_details(serde_json::json!({
                "status": "healthy",
                "connection": "ok"
            })),
            Err(err) => crate::health::HealthCheckResult::unhealthy_with_details(
                "DB health check failed".to_string(),
                serde_json::json!({
                    "status": "unhealthy",
                    "error": err.to_string()
                }),
            ),
        }
    }
}
