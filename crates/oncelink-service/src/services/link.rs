//! Link service
//!
//! Owner-scoped management of links plus the public, owner-agnostic consume.

use std::future::Future;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use oncelink_core::entities::{LinkRecord, NewLink};
use oncelink_core::error::DomainError;
use oncelink_core::lifecycle::{check_transition, LinkEvent, Transition};
use oncelink_core::token::{is_well_formed_token, token_hint};
use oncelink_core::traits::RepoResult;
use oncelink_core::value_objects::{LinkId, OwnerId};

use crate::dto::{
    CreateLinkRequest, LinkFilter, LinkResponse, LinkStatsResponse, OneTimeView,
    UpdateLinkRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Link service
pub struct LinkService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LinkService<'a> {
    /// Create a new LinkService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Run one store call under the configured deadline
    async fn store<T, F>(&self, operation: &'static str, call: F) -> ServiceResult<T>
    where
        F: Future<Output = RepoResult<T>>,
    {
        match tokio::time::timeout(self.ctx.store_timeout(), call).await {
            Ok(result) => result.map_err(ServiceError::from),
            Err(_) => {
                warn!(operation, timeout_ms = self.ctx.config().store_timeout_ms, "Store call timed out");
                Err(ServiceError::timeout(operation))
            }
        }
    }

    /// Load a link the caller owns
    async fn owned(&self, owner_id: OwnerId, link_id: LinkId) -> ServiceResult<LinkRecord> {
        self.store("find_link", self.ctx.link_repo().find_by_id(link_id, owner_id))
            .await?
            .ok_or_else(|| ServiceError::from(DomainError::LinkNotFound))
    }

    fn respond(&self, record: LinkRecord) -> LinkResponse {
        LinkResponse::from_record(record, &self.ctx.config().base_url, Utc::now())
    }

    /// Issue a new link with a fresh token
    ///
    /// Token collisions are retried with a new token up to the configured
    /// number of attempts.
    #[instrument(skip(self, request))]
    pub async fn create_link(
        &self,
        owner_id: OwnerId,
        request: CreateLinkRequest,
    ) -> ServiceResult<LinkResponse> {
        request.validate_content()?;

        let attempts = self.ctx.config().max_token_attempts;
        for attempt in 1..=attempts {
            let token = self.ctx.generate_token();
            // Such a link could never be opened
            if !is_well_formed_token(&token) {
                return Err(ServiceError::internal(
                    "token generator produced a malformed token",
                ));
            }

            let link = NewLink::new(
                owner_id,
                token,
                request.title.clone(),
                request.payload.clone(),
            )
            .with_expiration(request.expires_at);

            match self.store("insert_link", self.ctx.link_repo().insert(&link)).await {
                Ok(record) => {
                    info!(
                        link_id = %record.id,
                        owner_id = %owner_id,
                        token = %token_hint(&record.token),
                        expires_at = ?record.expires_at,
                        "Link created"
                    );
                    return Ok(self.created_response(record));
                }
                Err(ServiceError::Domain(DomainError::DuplicateToken)) => {
                    warn!(attempt, "Token collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::GenerationExhausted { attempts }.into())
    }

    fn created_response(&self, record: LinkRecord) -> LinkResponse {
        let limit = self.ctx.config().payload_warn_chars;
        let response = self.respond(record).with_payload_limit(limit);
        if response.payload_warning.is_some() {
            warn!(link_id = %response.id, limit, "Payload exceeds recommended size");
        }
        response
    }

    /// List an owner's links, newest first
    #[instrument(skip(self))]
    pub async fn list_links(
        &self,
        owner_id: OwnerId,
        filter: LinkFilter,
    ) -> ServiceResult<Vec<LinkResponse>> {
        let records = self
            .store("list_links", self.ctx.link_repo().find_by_owner(owner_id))
            .await?;

        let now = Utc::now();
        Ok(records
            .into_iter()
            .filter(|record| filter.matches(record, now))
            .map(|record| LinkResponse::from_record(record, &self.ctx.config().base_url, now))
            .collect())
    }

    /// Count an owner's links by filter
    #[instrument(skip(self))]
    pub async fn link_stats(&self, owner_id: OwnerId) -> ServiceResult<LinkStatsResponse> {
        let records = self
            .store("list_links", self.ctx.link_repo().find_by_owner(owner_id))
            .await?;

        Ok(LinkStatsResponse::tally(&records, Utc::now()))
    }

    /// Get one of the caller's links
    #[instrument(skip(self))]
    pub async fn get_link(&self, owner_id: OwnerId, link_id: LinkId) -> ServiceResult<LinkResponse> {
        let record = self.owned(owner_id, link_id).await?;
        Ok(self.respond(record))
    }

    /// Change title, payload, or deadline of an active, unexpired link
    #[instrument(skip(self, request))]
    pub async fn edit_link(
        &self,
        owner_id: OwnerId,
        link_id: LinkId,
        request: UpdateLinkRequest,
    ) -> ServiceResult<LinkResponse> {
        request.validate_content()?;
        let patch = request.into_patch();
        if patch.is_empty() {
            return Err(ServiceError::validation("Nothing to update"));
        }

        let current = self.owned(owner_id, link_id).await?;
        check_transition(&current, LinkEvent::Edit, Utc::now())?;

        let record = self
            .store(
                "update_link",
                self.ctx.link_repo().update_fields(link_id, owner_id, &patch),
            )
            .await?;

        info!(link_id = %link_id, owner_id = %owner_id, "Link updated");

        Ok(self.created_response(record))
    }

    /// Move a link to the trash; trashing twice is a no-op
    #[instrument(skip(self))]
    pub async fn trash_link(&self, owner_id: OwnerId, link_id: LinkId) -> ServiceResult<LinkResponse> {
        let current = self.owned(owner_id, link_id).await?;
        if check_transition(&current, LinkEvent::Trash, Utc::now())? == Transition::Unchanged {
            debug!(link_id = %link_id, "Link already trashed");
            return Ok(self.respond(current));
        }

        let record = self
            .store("trash_link", self.ctx.link_repo().soft_delete(link_id, owner_id))
            .await?;

        info!(link_id = %link_id, owner_id = %owner_id, status = %record.status, "Link trashed");

        Ok(self.respond(record))
    }

    /// Take a link out of the trash with its prior status intact
    #[instrument(skip(self))]
    pub async fn restore_link(
        &self,
        owner_id: OwnerId,
        link_id: LinkId,
    ) -> ServiceResult<LinkResponse> {
        let current = self.owned(owner_id, link_id).await?;
        if check_transition(&current, LinkEvent::Restore, Utc::now())? == Transition::Unchanged {
            debug!(link_id = %link_id, "Link not in trash");
            return Ok(self.respond(current));
        }

        let record = self
            .store("restore_link", self.ctx.link_repo().restore(link_id, owner_id))
            .await?;

        info!(link_id = %link_id, owner_id = %owner_id, status = %record.status, "Link restored");

        Ok(self.respond(record))
    }

    /// Permanently delete a link
    #[instrument(skip(self))]
    pub async fn purge_link(&self, owner_id: OwnerId, link_id: LinkId) -> ServiceResult<()> {
        let current = self.owned(owner_id, link_id).await?;
        check_transition(&current, LinkEvent::Purge, Utc::now())?;

        self.store("purge_link", self.ctx.link_repo().hard_delete(link_id, owner_id))
            .await?;

        info!(link_id = %link_id, owner_id = %owner_id, "Link purged");

        Ok(())
    }

    /// Open a link by token, consuming it
    ///
    /// Every definitive refusal (unknown, consumed, expired, trashed) is
    /// reported as [`ServiceError::LinkUnavailable`]. Store failures and
    /// timeouts pass through so the caller can retry.
    #[instrument(skip(self, token), fields(token = %token_hint(token)))]
    pub async fn consume_by_token(&self, token: &str) -> ServiceResult<OneTimeView> {
        if !is_well_formed_token(token) {
            debug!("Malformed token rejected");
            return Err(ServiceError::LinkUnavailable);
        }

        match self.store("consume", self.ctx.link_repo().consume(token)).await {
            Ok(record) => {
                info!(link_id = %record.id, access_count = record.access_count, "Link consumed");
                Ok(OneTimeView::from(record))
            }
            Err(ServiceError::Domain(
                e @ (DomainError::LinkNotFound
                | DomainError::AlreadyConsumed
                | DomainError::Expired
                | DomainError::InvalidState { .. }),
            )) => {
                debug!(reason = e.code(), "Consume refused");
                Err(ServiceError::LinkUnavailable)
            }
            Err(e) => Err(e),
        }
    }
}
