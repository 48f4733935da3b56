//! Test helpers for integration tests
//!
//! Provides service wiring over either store and shared assertions.

use std::sync::Arc;

use anyhow::Result;
use oncelink_common::{try_init_tracing, AppConfig, Environment, LinkConfig, TracingConfig};
use oncelink_core::OwnerId;
use oncelink_db::{create_pool, run_migrations};
use oncelink_service::{LinkService, OneTimeView, ServiceContext, ServiceError, ServiceResult};
use tracing::Level;

/// Wired service plus a fresh owner identity
#[derive(Clone)]
pub struct TestHarness {
    pub ctx: Arc<ServiceContext>,
    pub owner: OwnerId,
    pub label: &'static str,
}

impl TestHarness {
    /// Harness over the in-process store
    pub fn memory() -> Result<Self> {
        Self::memory_with_config(LinkConfig::default())
    }

    pub fn memory_with_config(config: LinkConfig) -> Result<Self> {
        init_test_tracing();
        let ctx = ServiceContext::in_memory(config)?;
        Ok(Self::from_context(ctx, "memory"))
    }

    /// Harness over PostgreSQL, or `None` when DATABASE_URL is not set
    pub async fn postgres() -> Result<Option<Self>> {
        if !check_test_env() {
            return Ok(None);
        }
        init_test_tracing();

        let config = test_config()?;
        let pool = create_pool(&config.database).await?;
        run_migrations(&pool).await?;
        let ctx = ServiceContext::postgres(pool, config.links)?;
        Ok(Some(Self::from_context(ctx, "postgres")))
    }

    /// Every store that is reachable from this environment
    pub async fn all() -> Result<Vec<Self>> {
        let mut harnesses = vec![Self::memory()?];
        harnesses.extend(Self::postgres().await?);
        Ok(harnesses)
    }

    fn from_context(ctx: ServiceContext, label: &'static str) -> Self {
        Self {
            ctx: Arc::new(ctx),
            owner: OwnerId::new(),
            label,
        }
    }

    /// Same store, different owner
    pub fn stranger(&self) -> Self {
        Self {
            ctx: Arc::clone(&self.ctx),
            owner: OwnerId::new(),
            label: self.label,
        }
    }

    pub fn service(&self) -> LinkService<'_> {
        LinkService::new(&self.ctx)
    }
}

/// Create a test configuration
pub fn test_config() -> Result<AppConfig> {
    // Load from environment or use defaults
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;
    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.database.url = url;
    }

    Ok(config)
}

/// Helper to check if the database is available
pub fn check_test_env() -> bool {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping postgres run: DATABASE_URL not set");
        return false;
    }

    true
}

/// Install a subscriber once per test binary; later calls are no-ops
pub fn init_test_tracing() {
    let config = TracingConfig::for_environment(Environment::Development).with_level(Level::WARN);
    let _ = try_init_tracing(&config);
}

/// Assert a consume was refused with the generic public error
pub fn assert_unavailable(result: &ServiceResult<OneTimeView>) -> Result<()> {
    match result {
        Err(ServiceError::LinkUnavailable) => Ok(()),
        Err(other) => anyhow::bail!("Expected LinkUnavailable, got {other}"),
        Ok(view) => anyhow::bail!("Expected LinkUnavailable, link opened: {}", view.title),
    }
}
