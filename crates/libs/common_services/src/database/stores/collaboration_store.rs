use crate::database::DbError;
use crate::database::collaboration::Collaboration;
use async_trait::async_trait;
use sqlx::PgPool;

/// Persists `(playlist, user)` collaboration grants.
///
/// Implementations must enforce the uniqueness of `(playlist_id, user_id)` atomically and report a
/// duplicate as [`DbError::UniqueViolation`].
#[async_trait]
pub trait CollaborationStore: Send + Sync {
    async fn find_by_playlist_and_user(
        &self,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<Option<Collaboration>, DbError>;

    async fn add(
        &self,
        collaboration_id: &str,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<Collaboration, DbError>;

    /// Returns the number of removed grants (0 or 1).
    async fn remove(&self, playlist_id: &str, user_id: &str) -> Result<u64, DbError>;
}

#[derive(Clone)]
pub struct PgCollaborationStore {
    pool: PgPool,
}

impl PgCollaborationStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CollaborationStore for PgCollaborationStore {
    async fn find_by_playlist_and_user(
        &self,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<Option<Collaboration>, DbError> {
        Ok(sqlx::query_as::<_, Collaboration>(
            r"
            SELECT id, playlist_id, user_id, created_at
            FROM collaboration
            WHERE playlist_id = $1 AND user_id = $2
            ",
        )
        .bind(playlist_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn add(
        &self,
        collaboration_id: &str,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<Collaboration, DbError> {
        // No ON CONFLICT: the unique constraint is what rejects concurrent duplicates.
        Ok(sqlx::query_as::<_, Collaboration>(
            r"
            INSERT INTO collaboration (id, playlist_id, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, playlist_id, user_id, created_at
            ",
        )
        .bind(collaboration_id)
        .bind(playlist_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn remove(&self, playlist_id: &str, user_id: &str) -> Result<u64, DbError> {
        let result =
            sqlx::query("DELETE FROM collaboration WHERE playlist_id = $1 AND user_id = $2")
                .bind(playlist_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}
