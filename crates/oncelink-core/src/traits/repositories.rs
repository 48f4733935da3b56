//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{LinkPatch, LinkRecord, NewLink};
use crate::error::DomainError;
use crate::value_objects::{LinkId, OwnerId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Link Repository
// ============================================================================

/// Persistent store of link records
///
/// Every owner-scoped method matches on both `id` and `owner_id`; a record
/// owned by someone else is indistinguishable from a missing one.
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Persist a new link, assigning its id and creation time
    ///
    /// Fails with `DuplicateToken` if the token is already taken.
    async fn insert(&self, link: &NewLink) -> RepoResult<LinkRecord>;

    /// Find a link by id within an owner's records
    async fn find_by_id(&self, id: LinkId, owner_id: OwnerId) -> RepoResult<Option<LinkRecord>>;

    /// Find a link by token without mutating it
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<LinkRecord>>;

    /// List an owner's links, newest first, trashed ones included
    async fn find_by_owner(&self, owner_id: OwnerId) -> RepoResult<Vec<LinkRecord>>;

    /// Update title, payload, or expiry
    ///
    /// Only applies while the link is Active, unexpired, and not trashed;
    /// otherwise fails with `InvalidState`.
    async fn update_fields(
        &self,
        id: LinkId,
        owner_id: OwnerId,
        patch: &LinkPatch,
    ) -> RepoResult<LinkRecord>;

    /// Set `deleted_at`; a link that is already trashed is returned unchanged
    async fn soft_delete(&self, id: LinkId, owner_id: OwnerId) -> RepoResult<LinkRecord>;

    /// Clear `deleted_at`; a link that is not trashed is returned unchanged
    async fn restore(&self, id: LinkId, owner_id: OwnerId) -> RepoResult<LinkRecord>;

    /// Remove a link permanently
    async fn hard_delete(&self, id: LinkId, owner_id: OwnerId) -> RepoResult<()>;

    /// Atomically transition an Active, unexpired, untrashed link to Consumed
    ///
    /// The guard and the mutation happen in one indivisible step against the
    /// store, so among any number of concurrent callers for the same token at
    /// most one receives the record. The rest get `AlreadyConsumed`, `Expired`,
    /// or `LinkNotFound` (missing or trashed).
    async fn consume(&self, token: &str) -> RepoResult<LinkRecord>;
}
