//! Link entity <-> model mapper

use oncelink_core::entities::{LinkRecord, LinkStatus, NewLink};
use oncelink_core::error::DomainError;
use oncelink_core::value_objects::{LinkId, OwnerId};
use uuid::Uuid;

use crate::models::LinkModel;

/// Convert LinkModel to LinkRecord entity
impl TryFrom<LinkModel> for LinkRecord {
    type Error = DomainError;

    fn try_from(model: LinkModel) -> Result<Self, Self::Error> {
        let status = LinkStatus::from_db(&model.status).ok_or_else(|| {
            DomainError::DatabaseError(format!(
                "unknown link status '{}' for link {}",
                model.status, model.id
            ))
        })?;

        Ok(LinkRecord {
            id: LinkId::from_uuid(model.id),
            owner_id: OwnerId::from_uuid(model.owner_id),
            token: model.token,
            title: model.title,
            payload: model.payload,
            status,
            expires_at: model.expires_at,
            consumed_at: model.consumed_at,
            access_count: model.access_count,
            deleted_at: model.deleted_at,
            created_at: model.created_at,
        })
    }
}

/// Convert a batch of rows, failing on the first malformed one
pub fn records_from_models(models: Vec<LinkModel>) -> Result<Vec<LinkRecord>, DomainError> {
    models.into_iter().map(LinkRecord::try_from).collect()
}

/// Values bound for insertion of a new link
pub struct LinkInsert<'a> {
    pub owner_id: Uuid,
    pub token: &'a str,
    pub title: &'a str,
    pub payload: &'a str,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl<'a> LinkInsert<'a> {
    pub fn new(link: &'a NewLink) -> Self {
        Self {
            owner_id: link.owner_id.into_inner(),
            token: &link.token,
            title: &link.title,
            payload: &link.payload,
            expires_at: link.expires_at,
        }
    }
}
