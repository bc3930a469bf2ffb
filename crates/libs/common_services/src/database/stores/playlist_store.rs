use crate::database::DbError;
use crate::database::playlist::{Playlist, PlaylistSummary};
use crate::database::song::SongSummary;
use async_trait::async_trait;
use sqlx::PgPool;

/// Persists playlists and which songs they contain.
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    /// Creates a playlist owned by `owner_id`.
    async fn create(&self, playlist_id: &str, name: &str, owner_id: &str)
    -> Result<Playlist, DbError>;

    async fn find_by_id(&self, playlist_id: &str) -> Result<Option<Playlist>, DbError>;

    /// All playlists the user owns or collaborates on.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<PlaylistSummary>, DbError>;

    /// Returns the number of deleted playlists (0 or 1).
    async fn delete(&self, playlist_id: &str) -> Result<u64, DbError>;

    /// Adds a song. Already present songs are ignored, an unknown song is a
    /// [`DbError::ForeignKeyViolation`].
    async fn add_song(&self, playlist_id: &str, song_id: &str) -> Result<(), DbError>;

    /// Returns the number of removed entries (0 or 1).
    async fn remove_song(&self, playlist_id: &str, song_id: &str) -> Result<u64, DbError>;

    async fn list_songs(&self, playlist_id: &str) -> Result<Vec<SongSummary>, DbError>;

    /// Username of the playlist's owner.
    async fn find_owner_username(&self, playlist_id: &str) -> Result<Option<String>, DbError>;
}

#[derive(Clone)]
pub struct PgPlaylistStore {
    pool: PgPool,
}

impl PgPlaylistStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaylistStore for PgPlaylistStore {
    async fn create(
        &self,
        playlist_id: &str,
        name: &str,
        owner_id: &str,
    ) -> Result<Playlist, DbError> {
        Ok(sqlx::query_as::<_, Playlist>(
            r"
            INSERT INTO playlist (id, name, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, owner_id, created_at, updated_at
            ",
        )
        .bind(playlist_id)
        .bind(name)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_by_id(&self, playlist_id: &str) -> Result<Option<Playlist>, DbError> {
        Ok(sqlx::query_as::<_, Playlist>(
            "SELECT id, name, owner_id, created_at, updated_at FROM playlist WHERE id = $1",
        )
        .bind(playlist_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<PlaylistSummary>, DbError> {
        Ok(sqlx::query_as::<_, PlaylistSummary>(
            r"
            SELECT p.id, p.name, u.username
            FROM playlist p
            JOIN app_user u ON u.id = p.owner_id
            -- Check collaboration status
            LEFT JOIN collaboration c ON c.playlist_id = p.id AND c.user_id = $1
            WHERE
                p.owner_id = $1     -- User is the owner
                OR
                c.user_id = $1      -- OR User is a collaborator
            ORDER BY p.created_at, p.id
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete(&self, playlist_id: &str) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM playlist WHERE id = $1")
            .bind(playlist_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn add_song(&self, playlist_id: &str, song_id: &str) -> Result<(), DbError> {
        sqlx::query(
            r"
            INSERT INTO playlist_song (playlist_id, song_id)
            VALUES ($1, $2)
            ON CONFLICT (playlist_id, song_id) DO NOTHING
            ",
        )
        .bind(playlist_id)
        .bind(song_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_song(&self, playlist_id: &str, song_id: &str) -> Result<u64, DbError> {
        let result =
            sqlx::query("DELETE FROM playlist_song WHERE playlist_id = $1 AND song_id = $2")
                .bind(playlist_id)
                .bind(song_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    async fn list_songs(&self, playlist_id: &str) -> Result<Vec<SongSummary>, DbError> {
        Ok(sqlx::query_as::<_, SongSummary>(
            r"
            SELECT s.id, s.title, s.performer
            FROM playlist_song ps
            JOIN song s ON s.id = ps.song_id
            WHERE ps.playlist_id = $1
            ORDER BY ps.added_at, ps.id
            ",
        )
        .bind(playlist_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_owner_username(&self, playlist_id: &str) -> Result<Option<String>, DbError> {
        Ok(sqlx::query_scalar::<_, String>(
            r"
            SELECT u.username
            FROM playlist p
            JOIN app_user u ON u.id = p.owner_id
            WHERE p.id = $1
            ",
        )
        .bind(playlist_id)
        .fetch_optional(&self.pool)
        .await?)
    }
}
