//! PostgreSQL connection pool management

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use oncelink_common::DatabaseConfig;

/// Schema for the link table; every statement is idempotent
const SCHEMA: &str = include_str!("../../migrations/0001_create_once_links.sql");

/// Create a new PostgreSQL connection pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await
}

/// Create a connection pool from the DATABASE_URL environment variable
pub async fn create_pool_from_env() -> Result<PgPool, sqlx::Error> {
    let mut config = DatabaseConfig::default();
    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.url = url;
    }
    create_pool(&config).await
}

/// Create the link table and its indexes if they do not exist
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    info!("Link schema is up to date");
    Ok(())
}
