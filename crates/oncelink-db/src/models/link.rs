//! Link database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for once_links table
#[derive(Debug, Clone, FromRow)]
pub struct LinkModel {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub token: String,
    pub title: String,
    pub payload: String,
    pub status: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub consumed_at: Option<DateTime<Utc>>,
    pub access_count: i32,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

