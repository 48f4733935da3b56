//! Service context - dependency container for services
//!
//! Holds the link store, the token source, and link settings.

use std::sync::Arc;
use std::time::Duration;

use oncelink_common::LinkConfig;
use oncelink_core::traits::LinkRepository;
use oncelink_core::{SecureTokenGenerator, TokenGenerator};
use oncelink_db::{MemoryLinkRepository, PgLinkRepository, PgPool};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Cheap to clone; every handle is shared.
#[derive(Clone)]
pub struct ServiceContext {
    link_repo: Arc<dyn LinkRepository>,
    token_generator: Arc<dyn TokenGenerator>,
    config: LinkConfig,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        link_repo: Arc<dyn LinkRepository>,
        token_generator: Arc<dyn TokenGenerator>,
        config: LinkConfig,
    ) -> Self {
        Self {
            link_repo,
            token_generator,
            config,
        }
    }

    /// Context backed by PostgreSQL
    pub fn postgres(pool: PgPool, config: LinkConfig) -> ServiceResult<Self> {
        ServiceContextBuilder::new()
            .link_repo(Arc::new(PgLinkRepository::new(pool)))
            .config(config)
            .build()
    }

    /// Context backed by an in-process store
    pub fn in_memory(config: LinkConfig) -> ServiceResult<Self> {
        ServiceContextBuilder::new()
            .link_repo(Arc::new(MemoryLinkRepository::new()))
            .config(config)
            .build()
    }

    // === Repositories ===

    /// Get the link repository
    pub fn link_repo(&self) -> &dyn LinkRepository {
        self.link_repo.as_ref()
    }

    // === Services ===

    /// Generate a new link token
    pub fn generate_token(&self) -> String {
        self.token_generator.generate()
    }

    // === Settings ===

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn store_timeout(&self) -> Duration {
        self.config.store_timeout()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("link_repo", &"dyn LinkRepository")
            .field("token_generator", &"dyn TokenGenerator")
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    link_repo: Option<Arc<dyn LinkRepository>>,
    token_generator: Option<Arc<dyn TokenGenerator>>,
    config: Option<LinkConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            link_repo: None,
            token_generator: None,
            config: None,
        }
    }

    pub fn link_repo(mut self, repo: Arc<dyn LinkRepository>) -> Self {
        self.link_repo = Some(repo);
        self
    }

    pub fn token_generator(mut self, generator: Arc<dyn TokenGenerator>) -> Self {
        self.token_generator = Some(generator);
        self
    }

    pub fn config(mut self, config: LinkConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the ServiceContext
    ///
    /// Without an explicit generator, one is built from `token_length`.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if the link store is missing or the
    /// configured token length is too short
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let link_repo = self
            .link_repo
            .ok_or_else(|| ServiceError::validation("link_repo is required"))?;
        let config = self.config.unwrap_or_default();
        let token_generator = match self.token_generator {
            Some(generator) => generator,
            None => Arc::new(SecureTokenGenerator::new(config.token_length)?),
        };

        Ok(ServiceContext::new(link_repo, token_generator, config))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_repo() {
        let err = ServiceContextBuilder::new().build().unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn test_builder_rejects_short_tokens() {
        let config = LinkConfig {
            token_length: 8,
            ..LinkConfig::default()
        };
        assert!(ServiceContext::in_memory(config).is_err());
    }

    #[test]
    fn test_in_memory_context() {
        let ctx = ServiceContext::in_memory(LinkConfig::default()).unwrap();
        assert_eq!(ctx.generate_token().len(), 32);
        assert_eq!(ctx.store_timeout(), Duration::from_millis(5000));
    }
}
