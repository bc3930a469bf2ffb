use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// A grant of collaborator access on a playlist. `(playlist_id, user_id)` is unique.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Collaboration {
    pub id: String,
    pub playlist_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}
