//! In-memory backend implementing every store trait, for tests.
//!
//! All tables live behind one mutex, so a check followed by an insert happens under a single guard
//! and behaves like the `UNIQUE` constraints of the Postgres schema.

use crate::database::DbError;
use crate::database::app_user::User;
use crate::database::collaboration::Collaboration;
use crate::database::collaboration_store::CollaborationStore;
use crate::database::playlist::{Playlist, PlaylistSummary};
use crate::database::playlist_store::PlaylistStore;
use crate::database::song::SongSummary;
use crate::database::user_store::UserStore;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    songs: Vec<SongSummary>,
    playlists: Vec<Playlist>,
    playlist_songs: Vec<(String, String)>,
    collaborations: Vec<Collaboration>,
}

#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<Mutex<Tables>>,
}

fn constraint_error(message: &str) -> sqlx::Error {
    sqlx::Error::Protocol(message.to_owned())
}

impl InMemoryDatabase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // A panicking test must not poison the tables for the others.
        self.tables
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub fn insert_user(&self, user_id: &str, username: &str) -> User {
        let user = User {
            id: user_id.to_owned(),
            username: username.to_owned(),
            fullname: username.to_owned(),
            created_at: Utc::now(),
        };
        self.lock().users.push(user.clone());
        user
    }

    pub fn insert_song(&self, song_id: &str, title: &str, performer: &str) -> SongSummary {
        let song = SongSummary {
            id: song_id.to_owned(),
            title: title.to_owned(),
            performer: performer.to_owned(),
        };
        self.lock().songs.push(song.clone());
        song
    }

    /// Inserts a playlist with a fixed id, bypassing id generation.
    pub fn insert_playlist(&self, playlist_id: &str, name: &str, owner_id: &str) -> Playlist {
        let now = Utc::now();
        let playlist = Playlist {
            id: playlist_id.to_owned(),
            name: name.to_owned(),
            owner_id: owner_id.to_owned(),
            created_at: now,
            updated_at: now,
        };
        self.lock().playlists.push(playlist.clone());
        playlist
    }

    /// Number of grants stored for `(playlist_id, user_id)`.
    #[must_use]
    pub fn collaboration_count(&self, playlist_id: &str, user_id: &str) -> usize {
        self.lock()
            .collaborations
            .iter()
            .filter(|c| c.playlist_id == playlist_id && c.user_id == user_id)
            .count()
    }

    #[must_use]
    pub fn song_ids(&self, playlist_id: &str) -> Vec<String> {
        self.lock()
            .playlist_songs
            .iter()
            .filter(|(p, _)| p == playlist_id)
            .map(|(_, s)| s.clone())
            .collect()
    }
}

#[async_trait]
impl UserStore for InMemoryDatabase {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, DbError> {
        Ok(self.lock().users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}

#[async_trait]
impl CollaborationStore for InMemoryDatabase {
    async fn find_by_playlist_and_user(
        &self,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<Option<Collaboration>, DbError> {
        Ok(self
            .lock()
            .collaborations
            .iter()
            .find(|c| c.playlist_id == playlist_id && c.user_id == user_id)
            .cloned())
    }

    async fn add(
        &self,
        collaboration_id: &str,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<Collaboration, DbError> {
        let mut tables = self.lock();
        if !tables.playlists.iter().any(|p| p.id == playlist_id)
            || !tables.users.iter().any(|u| u.id == user_id)
        {
            return Err(DbError::ForeignKeyViolation(constraint_error(
                "collaboration references a missing playlist or user",
            )));
        }
        if tables
            .collaborations
            .iter()
            .any(|c| c.playlist_id == playlist_id && c.user_id == user_id)
        {
            return Err(DbError::UniqueViolation(constraint_error(
                "collaboration_playlist_user_key",
            )));
        }
        let collaboration = Collaboration {
            id: collaboration_id.to_owned(),
            playlist_id: playlist_id.to_owned(),
            user_id: user_id.to_owned(),
            created_at: Utc::now(),
        };
        tables.collaborations.push(collaboration.clone());
        Ok(collaboration)
    }

    async fn remove(&self, playlist_id: &str, user_id: &str) -> Result<u64, DbError> {
        let mut tables = self.lock();
        let before = tables.collaborations.len();
        tables
            .collaborations
            .retain(|c| !(c.playlist_id == playlist_id && c.user_id == user_id));
        Ok((before - tables.collaborations.len()) as u64)
    }
}

#[async_trait]
impl PlaylistStore for InMemoryDatabase {
    async fn create(
        &self,
        playlist_id: &str,
        name: &str,
        owner_id: &str,
    ) -> Result<Playlist, DbError> {
        if !self.lock().users.iter().any(|u| u.id == owner_id) {
            return Err(DbError::ForeignKeyViolation(constraint_error(
                "playlist references a missing owner",
            )));
        }
        Ok(self.insert_playlist(playlist_id, name, owner_id))
    }

    async fn find_by_id(&self, playlist_id: &str) -> Result<Option<Playlist>, DbError> {
        Ok(self
            .lock()
            .playlists
            .iter()
            .find(|p| p.id == playlist_id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<PlaylistSummary>, DbError> {
        let tables = self.lock();
        Ok(tables
            .playlists
            .iter()
            .filter(|p| {
                p.owner_id == user_id
                    || tables
                        .collaborations
                        .iter()
                        .any(|c| c.playlist_id == p.id && c.user_id == user_id)
            })
            .map(|p| PlaylistSummary {
                id: p.id.clone(),
                name: p.name.clone(),
                username: tables
                    .users
                    .iter()
                    .find(|u| u.id == p.owner_id)
                    .map(|u| u.username.clone())
                    .unwrap_or_default(),
            })
            .collect())
    }

    async fn delete(&self, playlist_id: &str) -> Result<u64, DbError> {
        let mut tables = self.lock();
        let before = tables.playlists.len();
        tables.playlists.retain(|p| p.id != playlist_id);
        let removed = before - tables.playlists.len();
        if removed > 0 {
            tables.playlist_songs.retain(|(p, _)| p != playlist_id);
            tables.collaborations.retain(|c| c.playlist_id != playlist_id);
        }
        Ok(removed as u64)
    }

    async fn add_song(&self, playlist_id: &str, song_id: &str) -> Result<(), DbError> {
        let mut tables = self.lock();
        if !tables.songs.iter().any(|s| s.id == song_id)
            || !tables.playlists.iter().any(|p| p.id == playlist_id)
        {
            return Err(DbError::ForeignKeyViolation(constraint_error(
                "playlist_song references a missing playlist or song",
            )));
        }
        let entry = (playlist_id.to_owned(), song_id.to_owned());
        if !tables.playlist_songs.contains(&entry) {
            tables.playlist_songs.push(entry);
        }
        Ok(())
    }

    async fn remove_song(&self, playlist_id: &str, song_id: &str) -> Result<u64, DbError> {
        let mut tables = self.lock();
        let before = tables.playlist_songs.len();
        tables
            .playlist_songs
            .retain(|(p, s)| !(p == playlist_id && s == song_id));
        Ok((before - tables.playlist_songs.len()) as u64)
    }

    async fn list_songs(&self, playlist_id: &str) -> Result<Vec<SongSummary>, DbError> {
        let tables = self.lock();
        Ok(tables
            .playlist_songs
            .iter()
            .filter(|(p, _)| p == playlist_id)
            .filter_map(|(_, song_id)| tables.songs.iter().find(|s| &s.id == song_id).cloned())
            .collect())
    }

    async fn find_owner_username(&self, playlist_id: &str) -> Result<Option<String>, DbError> {
        let tables = self.lock();
        Ok(tables
            .playlists
            .iter()
            .find(|p| p.id == playlist_id)
            .and_then(|p| tables.users.iter().find(|u| u.id == p.owner_id))
            .map(|u| u.username.clone()))
    }
}
