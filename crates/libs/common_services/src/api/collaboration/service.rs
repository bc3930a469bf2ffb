use super::interfaces::CollaborationRequest;
use crate::api::playlist::access::AccessResolver;
use crate::api::playlist::error::PlaylistError;
use crate::database::DbError;
use crate::database::collaboration::Collaboration;
use crate::database::collaboration_store::CollaborationStore;
use crate::database::playlist::AccessLevel;
use crate::database::user_store::UserStore;
use crate::utils::prefixed_id;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

/// Grants and revokes collaborator access. Only a playlist's owner manages its collaborators.
#[derive(Clone)]
pub struct CollaborationService {
    collaborations: Arc<dyn CollaborationStore>,
    users: Arc<dyn UserStore>,
    access: AccessResolver,
}

impl CollaborationService {
    #[must_use]
    pub fn new(
        collaborations: Arc<dyn CollaborationStore>,
        users: Arc<dyn UserStore>,
        access: AccessResolver,
    ) -> Self {
        Self {
            collaborations,
            users,
            access,
        }
    }

    /// Adds `request.user_id` as collaborator on `request.playlist_id`.
    ///
    /// Fails with `Conflict` if the grant already exists; the store's unique constraint decides,
    /// so two concurrent adds of the same pair yield exactly one success.
    #[instrument(skip(self))]
    pub async fn add_collaborator(
        &self,
        requesting_user_id: &str,
        request: &CollaborationRequest,
    ) -> Result<Collaboration, PlaylistError> {
        request.validate()?;
        let access = self
            .access
            .verify_access(
                &request.playlist_id,
                requesting_user_id,
                AccessLevel::OwnerOnly,
            )
            .await?;

        if access.playlist.owner_id == request.user_id {
            return Err(PlaylistError::Validation(
                "The playlist owner cannot be added as a collaborator".to_string(),
            ));
        }

        if self.users.find_by_id(&request.user_id).await?.is_none() {
            return Err(PlaylistError::NotFound("User not found".to_string()));
        }

        let collaboration = self
            .collaborations
            .add(
                &prefixed_id("collab"),
                &request.playlist_id,
                &request.user_id,
            )
            .await
            .map_err(|e| match e {
                DbError::UniqueViolation(_) => PlaylistError::Conflict(
                    "User is already a collaborator on this playlist".to_string(),
                ),
                // Playlist or user removed between the checks and the insert.
                DbError::ForeignKeyViolation(_) => {
                    PlaylistError::NotFound("Playlist or user not found".to_string())
                }
                e => e.into(),
            })?;

        info!(
            "User {} is now a collaborator on playlist {}",
            collaboration.user_id, collaboration.playlist_id
        );
        Ok(collaboration)
    }

    /// Revokes a grant. Removing a grant that does not exist is `NotFound`, also the second time.
    #[instrument(skip(self))]
    pub async fn remove_collaborator(
        &self,
        requesting_user_id: &str,
        request: &CollaborationRequest,
    ) -> Result<(), PlaylistError> {
        request.validate()?;
        self.access
            .verify_access(
                &request.playlist_id,
                requesting_user_id,
                AccessLevel::OwnerOnly,
            )
            .await?;

        let removed = self
            .collaborations
            .remove(&request.playlist_id, &request.user_id)
            .await?;
        if removed == 0 {
            return Err(PlaylistError::NotFound(
                "Collaboration not found".to_string(),
            ));
        }

        info!(
            "User {} is no longer a collaborator on playlist {}",
            request.user_id, request.playlist_id
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::InMemoryDatabase;
    use crate::database::playlist::PlaylistRole;

    fn setup() -> (InMemoryDatabase, CollaborationService) {
        let db = InMemoryDatabase::new();
        db.insert_user("u1", "owner");
        db.insert_user("u2", "friend");
        db.insert_user("u3", "stranger");
        db.insert_playlist("p1", "Road trip", "u1");
        let access = AccessResolver::new(Arc::new(db.clone()), Arc::new(db.clone()));
        let service =
            CollaborationService::new(Arc::new(db.clone()), Arc::new(db.clone()), access);
        (db, service)
    }

    fn grant(playlist_id: &str, user_id: &str) -> CollaborationRequest {
        CollaborationRequest {
            playlist_id: playlist_id.to_owned(),
            user_id: user_id.to_owned(),
        }
    }

    #[tokio::test]
    async fn owner_adds_collaborator() {
        let (db, service) = setup();
        let collaboration = service
            .add_collaborator("u1", &grant("p1", "u2"))
            .await
            .expect("collaborator is added");

        assert!(collaboration.id.starts_with("collab-"));
        assert_eq!(db.collaboration_count("p1", "u2"), 1);
        assert_eq!(
            service
                .access
                .resolve_access("p1", "u2")
                .await
                .expect("resolves"),
            PlaylistRole::Collaborator
        );
    }

    #[tokio::test]
    async fn duplicate_collaboration_is_conflict() {
        let (db, service) = setup();
        service
            .add_collaborator("u1", &grant("p1", "u2"))
            .await
            .expect("first add succeeds");

        for _ in 0..3 {
            let result = service.add_collaborator("u1", &grant("p1", "u2")).await;
            assert!(matches!(result, Err(PlaylistError::Conflict(_))));
        }
        assert_eq!(db.collaboration_count("p1", "u2"), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_duplicate_adds_store_one_grant() {
        let (db, service) = setup();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.add_collaborator("u1", &grant("p1", "u2")).await })
            })
            .collect();

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.expect("task completes") {
                Ok(_) => successes += 1,
                Err(PlaylistError::Conflict(_)) => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 7);
        assert_eq!(db.collaboration_count("p1", "u2"), 1);
    }

    #[tokio::test]
    async fn collaborator_cannot_add_collaborators() {
        let (_db, service) = setup();
        service
            .add_collaborator("u1", &grant("p1", "u2"))
            .await
            .expect("owner adds u2");

        let result = service.add_collaborator("u2", &grant("p1", "u3")).await;
        assert!(matches!(result, Err(PlaylistError::Forbidden(_))));
    }

    #[tokio::test]
    async fn missing_user_or_playlist_is_not_found() {
        let (_db, service) = setup();
        assert!(matches!(
            service.add_collaborator("u1", &grant("p1", "ghost")).await,
            Err(PlaylistError::NotFound(_))
        ));
        assert!(matches!(
            service.add_collaborator("u1", &grant("missing", "u2")).await,
            Err(PlaylistError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn owner_cannot_collaborate_on_own_playlist() {
        let (_db, service) = setup();
        assert!(matches!(
            service.add_collaborator("u1", &grant("p1", "u1")).await,
            Err(PlaylistError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn removing_twice_fails_the_second_time() {
        let (_db, service) = setup();
        service
            .add_collaborator("u1", &grant("p1", "u2"))
            .await
            .expect("collaborator is added");

        service
            .remove_collaborator("u1", &grant("p1", "u2"))
            .await
            .expect("first removal succeeds");
        assert!(matches!(
            service.remove_collaborator("u1", &grant("p1", "u2")).await,
            Err(PlaylistError::NotFound(_))
        ));
        assert_eq!(
            service
                .access
                .resolve_access("p1", "u2")
                .await
                .expect("resolves"),
            PlaylistRole::None
        );
    }

    #[tokio::test]
    async fn removing_unknown_collaboration_is_not_found() {
        let (_db, service) = setup();
        assert!(matches!(
            service.remove_collaborator("u1", &grant("p1", "u3")).await,
            Err(PlaylistError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn empty_ids_are_validation_errors() {
        let (_db, service) = setup();
        assert!(matches!(
            service.add_collaborator("u1", &grant("", "u2")).await,
            Err(PlaylistError::Validation(_))
        ));
    }
}
