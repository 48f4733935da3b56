//! PostgreSQL implementation of LinkRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, instrument};

use oncelink_core::entities::{LinkPatch, LinkRecord, NewLink};
use oncelink_core::error::DomainError;
use oncelink_core::lifecycle::{check_transition, LinkEvent};
use oncelink_core::token::token_hint;
use oncelink_core::traits::{LinkRepository, RepoResult};
use oncelink_core::value_objects::{LinkId, OwnerId};

use crate::mappers::{records_from_models, LinkInsert};
use crate::models::LinkModel;

use super::error::{link_not_found, map_db_error, map_unique_violation};

/// PostgreSQL implementation of LinkRepository
#[derive(Clone)]
pub struct PgLinkRepository {
    pool: PgPool,
}

impl PgLinkRepository {
    /// Create a new PgLinkRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Explain why a conditional update matched no row
    ///
    /// Only ever produces an error; success is decided solely by the update.
    fn rejection(record: &LinkRecord, event: LinkEvent) -> DomainError {
        match check_transition(record, event, Utc::now()) {
            Err(err) => err,
            // The row passed our guard but not the database's: the two clocks
            // disagree about the deadline.
            Ok(_) => match event {
                LinkEvent::Consume if record.expires_at.is_some() => DomainError::Expired,
                LinkEvent::Consume => DomainError::AlreadyConsumed,
                _ => DomainError::InvalidState {
                    state: "expired",
                    action: event.as_str(),
                },
            },
        }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    #[instrument(skip(self, link), fields(owner_id = %link.owner_id, token = %token_hint(&link.token)))]
    async fn insert(&self, link: &NewLink) -> RepoResult<LinkRecord> {
        let insert = LinkInsert::new(link);

        let model = sqlx::query_as::<_, LinkModel>(
            r#"
            INSERT INTO once_links (owner_id, token, title, payload, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, owner_id, token, title, payload, status, expires_at,
                      consumed_at, access_count, deleted_at, created_at
            "#,
        )
        .bind(insert.owner_id)
        .bind(insert.token)
        .bind(insert.title)
        .bind(insert.payload)
        .bind(insert.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::DuplicateToken))?;

        LinkRecord::try_from(model)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: LinkId, owner_id: OwnerId) -> RepoResult<Option<LinkRecord>> {
        let result = sqlx::query_as::<_, LinkModel>(
            r#"
            SELECT id, owner_id, token, title, payload, status, expires_at,
                   consumed_at, access_count, deleted_at, created_at
            FROM once_links
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id.into_inner())
        .bind(owner_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(LinkRecord::try_from).transpose()
    }

    #[instrument(skip(self, token), fields(token = %token_hint(token)))]
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<LinkRecord>> {
        let result = sqlx::query_as::<_, LinkModel>(
            r#"
            SELECT id, owner_id, token, title, payload, status, expires_at,
                   consumed_at, access_count, deleted_at, created_at
            FROM once_links
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(LinkRecord::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_owner(&self, owner_id: OwnerId) -> RepoResult<Vec<LinkRecord>> {
        let results = sqlx::query_as::<_, LinkModel>(
            r#"
            SELECT id, owner_id, token, title, payload, status, expires_at,
                   consumed_at, access_count, deleted_at, created_at
            FROM once_links
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        records_from_models(results)
    }

    #[instrument(skip(self, patch))]
    async fn update_fields(
        &self,
        id: LinkId,
        owner_id: OwnerId,
        patch: &LinkPatch,
    ) -> RepoResult<LinkRecord> {
        let (set_expiry, expires_at) = match patch.expires_at {
            Some(value) => (true, value),
            None => (false, None),
        };

        let updated = sqlx::query_as::<_, LinkModel>(
            r#"
            UPDATE once_links
            SET title = COALESCE($3::text, title),
                payload = COALESCE($4::text, payload),
                expires_at = CASE WHEN $5::boolean THEN $6::timestamptz ELSE expires_at END
            WHERE id = $1
              AND owner_id = $2
              AND status = 'active'
              AND deleted_at IS NULL
              AND (expires_at IS NULL OR expires_at > NOW())
            RETURNING id, owner_id, token, title, payload, status, expires_at,
                      consumed_at, access_count, deleted_at, created_at
            "#,
        )
        .bind(id.into_inner())
        .bind(owner_id.into_inner())
        .bind(patch.title.as_deref())
        .bind(patch.payload.as_deref())
        .bind(set_expiry)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        match updated {
            Some(model) => LinkRecord::try_from(model),
            None => {
                let current = self
                    .find_by_id(id, owner_id)
                    .await?
                    .ok_or_else(link_not_found)?;
                Err(Self::rejection(&current, LinkEvent::Edit))
            }
        }
    }

    #[instrument(skip(self))]
    async fn soft_delete(&self, id: LinkId, owner_id: OwnerId) -> RepoResult<LinkRecord> {
        let model = sqlx::query_as::<_, LinkModel>(
            r#"
            UPDATE once_links
            SET deleted_at = COALESCE(deleted_at, NOW())
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, token, title, payload, status, expires_at,
                      consumed_at, access_count, deleted_at, created_at
            "#,
        )
        .bind(id.into_inner())
        .bind(owner_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .ok_or_else(link_not_found)?;

        LinkRecord::try_from(model)
    }

    #[instrument(skip(self))]
    async fn restore(&self, id: LinkId, owner_id: OwnerId) -> RepoResult<LinkRecord> {
        let model = sqlx::query_as::<_, LinkModel>(
            r#"
            UPDATE once_links
            SET deleted_at = NULL
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, token, title, payload, status, expires_at,
                      consumed_at, access_count, deleted_at, created_at
            "#,
        )
        .bind(id.into_inner())
        .bind(owner_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .ok_or_else(link_not_found)?;

        LinkRecord::try_from(model)
    }

    #[instrument(skip(self))]
    async fn hard_delete(&self, id: LinkId, owner_id: OwnerId) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM once_links
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id.into_inner())
        .bind(owner_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(link_not_found());
        }

        Ok(())
    }

    #[instrument(skip(self, token), fields(token = %token_hint(token)))]
    async fn consume(&self, token: &str) -> RepoResult<LinkRecord> {
        // Guard and mutation in one statement. A concurrent winner's commit makes
        // the losers re-evaluate the WHERE clause against the consumed row.
        let consumed = sqlx::query_as::<_, LinkModel>(
            r#"
            UPDATE once_links
            SET status = 'consumed',
                consumed_at = NOW(),
                access_count = access_count + 1
            WHERE token = $1
              AND status = 'active'
              AND deleted_at IS NULL
              AND (expires_at IS NULL OR expires_at > NOW())
            RETURNING id, owner_id, token, title, payload, status, expires_at,
                      consumed_at, access_count, deleted_at, created_at
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        if let Some(model) = consumed {
            return LinkRecord::try_from(model);
        }

        let current = self.find_by_token(token).await?.ok_or_else(link_not_found)?;
        let err = Self::rejection(&current, LinkEvent::Consume);
        debug!(reason = err.code(), "Consume rejected");
        Err(err)
    }
}
