//! In-memory implementation of LinkRepository
//!
//! Records live in a `DashMap` keyed by id, with a second map from token to
//! id. Every mutation happens while holding the record's entry lock, which is
//! what makes `consume` indivisible here. The guarantee only covers callers
//! sharing this instance; use the PostgreSQL store across processes.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use tracing::{debug, instrument};

use oncelink_core::entities::{LinkPatch, LinkRecord, NewLink};
use oncelink_core::error::DomainError;
use oncelink_core::lifecycle::{check_transition, LinkEvent, Transition};
use oncelink_core::token::token_hint;
use oncelink_core::traits::{LinkRepository, RepoResult};
use oncelink_core::value_objects::{LinkId, OwnerId};

use super::error::link_not_found;

/// In-process link store
#[derive(Debug, Default)]
pub struct MemoryLinkRepository {
    links: DashMap<LinkId, LinkRecord>,
    tokens: DashMap<String, LinkId>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, trashed ones included
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Lock an owner's record for mutation
    fn owned_mut(&self, id: LinkId, owner_id: OwnerId) -> RepoResult<RefMut<'_, LinkId, LinkRecord>> {
        self.links
            .get_mut(&id)
            .filter(|entry| entry.owner_id == owner_id)
            .ok_or_else(link_not_found)
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    #[instrument(skip(self, link), fields(owner_id = %link.owner_id, token = %token_hint(&link.token)))]
    async fn insert(&self, link: &NewLink) -> RepoResult<LinkRecord> {
        match self.tokens.entry(link.token.clone()) {
            Entry::Occupied(_) => Err(DomainError::DuplicateToken),
            Entry::Vacant(slot) => {
                let id = LinkId::new();
                let record = LinkRecord::from_new(id, link, Utc::now());
                // The record must exist before its token becomes resolvable.
                self.links.insert(id, record.clone());
                slot.insert(id);
                Ok(record)
            }
        }
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: LinkId, owner_id: OwnerId) -> RepoResult<Option<LinkRecord>> {
        Ok(self
            .links
            .get(&id)
            .filter(|entry| entry.owner_id == owner_id)
            .map(|entry| entry.value().clone()))
    }

    #[instrument(skip(self, token), fields(token = %token_hint(token)))]
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<LinkRecord>> {
        let Some(id) = self.tokens.get(token).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        Ok(self.links.get(&id).map(|entry| entry.value().clone()))
    }

    #[instrument(skip(self))]
    async fn find_by_owner(&self, owner_id: OwnerId) -> RepoResult<Vec<LinkRecord>> {
        let mut records: Vec<LinkRecord> = self
            .links
            .iter()
            .filter(|entry| entry.owner_id == owner_id)
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    #[instrument(skip(self, patch))]
    async fn update_fields(
        &self,
        id: LinkId,
        owner_id: OwnerId,
        patch: &LinkPatch,
    ) -> RepoResult<LinkRecord> {
        let mut entry = self.owned_mut(id, owner_id)?;
        check_transition(entry.value(), LinkEvent::Edit, Utc::now())?;
        patch.apply_to(entry.value_mut());
        Ok(entry.value().clone())
    }

    #[instrument(skip(self))]
    async fn soft_delete(&self, id: LinkId, owner_id: OwnerId) -> RepoResult<LinkRecord> {
        let mut entry = self.owned_mut(id, owner_id)?;
        if check_transition(entry.value(), LinkEvent::Trash, Utc::now())? == Transition::Apply {
            entry.deleted_at = Some(Utc::now());
        }
        Ok(entry.value().clone())
    }

    #[instrument(skip(self))]
    async fn restore(&self, id: LinkId, owner_id: OwnerId) -> RepoResult<LinkRecord> {
        let mut entry = self.owned_mut(id, owner_id)?;
        if check_transition(entry.value(), LinkEvent::Restore, Utc::now())? == Transition::Apply {
            entry.deleted_at = None;
        }
        Ok(entry.value().clone())
    }

    #[instrument(skip(self))]
    async fn hard_delete(&self, id: LinkId, owner_id: OwnerId) -> RepoResult<()> {
        let (_, record) = self
            .links
            .remove_if(&id, |_, record| record.owner_id == owner_id)
            .ok_or_else(link_not_found)?;
        self.tokens.remove(&record.token);
        Ok(())
    }

    #[instrument(skip(self, token), fields(token = %token_hint(token)))]
    async fn consume(&self, token: &str) -> RepoResult<LinkRecord> {
        let id = self
            .tokens
            .get(token)
            .map(|entry| *entry.value())
            .ok_or_else(link_not_found)?;

        // Held until return: no other caller can observe or change the record
        // between the guard and the mutation.
        let mut entry = self.links.get_mut(&id).ok_or_else(link_not_found)?;
        let now = Utc::now();

        if let Err(err) = check_transition(entry.value(), LinkEvent::Consume, now) {
            debug!(reason = err.code(), "Consume rejected");
            return Err(err);
        }

        entry.mark_consumed(now);
        Ok(entry.value().clone())
    }
}
