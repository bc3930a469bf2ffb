use super::interfaces::{ExportPlaylistJob, ExportPlaylistRequest, ExportStatus};
use crate::api::playlist::access::AccessResolver;
use crate::api::playlist::error::PlaylistError;
use crate::database::playlist::AccessLevel;
use crate::message_channel::MessageChannel;
use app_state::ExportSettings;
use std::sync::Arc;
use tracing::{error, info, instrument};
use validator::Validate;

/// Turns authorized export requests into jobs on the message channel.
#[derive(Clone)]
pub struct ExportService {
    access: AccessResolver,
    channel: Arc<dyn MessageChannel>,
    settings: ExportSettings,
}

impl ExportService {
    #[must_use]
    pub fn new(
        access: AccessResolver,
        channel: Arc<dyn MessageChannel>,
        settings: ExportSettings,
    ) -> Self {
        Self {
            access,
            channel,
            settings,
        }
    }

    /// Validates the request, checks owner-or-collaborator access and publishes the export job.
    ///
    /// With `degrade_on_channel_failure` a failed publish is only logged and the request is still
    /// reported as queued. Only validation and access failures are returned in that mode.
    #[instrument(skip(self, request))]
    pub async fn submit_export(
        &self,
        playlist_id: &str,
        requester_id: &str,
        request: &ExportPlaylistRequest,
    ) -> Result<ExportStatus, PlaylistError> {
        request.validate()?;
        let Some(target_email) = request.target_email.clone() else {
            return Err(PlaylistError::Validation(
                "targetEmail is required".to_string(),
            ));
        };

        self.access
            .verify_access(playlist_id, requester_id, AccessLevel::OwnerOrCollaborator)
            .await?;

        let job = ExportPlaylistJob {
            user_id: requester_id.to_owned(),
            playlist_id: playlist_id.to_owned(),
            target_email,
        };
        let payload = serde_json::to_string(&job)?;

        match self.channel.publish(&self.settings.topic, &payload).await {
            Ok(()) => info!(
                "Queued export of playlist {} requested by {}",
                playlist_id, requester_id
            ),
            Err(e) if self.settings.degrade_on_channel_failure => error!(
                "Export queueing failed for playlist {}, request still accepted: {}",
                playlist_id, e
            ),
            Err(e) => return Err(e.into()),
        }

        Ok(ExportStatus::Queued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::collaboration_store::CollaborationStore;
    use crate::database::memory::InMemoryDatabase;
    use crate::message_channel::memory::InMemoryChannel;

    /// p1 is owned by u1, u2 collaborates on it, u3 is unrelated.
    async fn setup(channel: InMemoryChannel, degrade: bool) -> ExportService {
        let db = InMemoryDatabase::new();
        db.insert_user("u1", "owner");
        db.insert_user("u2", "friend");
        db.insert_user("u3", "stranger");
        db.insert_playlist("p1", "Road trip", "u1");
        CollaborationStore::add(&db, "collab-1", "p1", "u2")
            .await
            .expect("grant is stored");

        let access = AccessResolver::new(Arc::new(db.clone()), Arc::new(db));
        ExportService::new(
            access,
            Arc::new(channel),
            ExportSettings {
                topic: "export:playlists".to_owned(),
                degrade_on_channel_failure: degrade,
            },
        )
    }

    fn to(email: &str) -> ExportPlaylistRequest {
        ExportPlaylistRequest {
            target_email: Some(email.to_owned()),
        }
    }

    #[tokio::test]
    async fn collaborator_export_publishes_job() {
        let channel = InMemoryChannel::new();
        let service = setup(channel.clone(), true).await;

        let status = service
            .submit_export("p1", "u2", &to("a@b.com"))
            .await
            .expect("export is queued");

        assert_eq!(status, ExportStatus::Queued);
        let published = channel.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].topic, "export:playlists");
        assert_eq!(
            published[0].payload,
            r#"{"userId":"u2","playlistId":"p1","targetEmail":"a@b.com"}"#
        );
    }

    #[tokio::test]
    async fn owner_export_publishes_job() {
        let channel = InMemoryChannel::new();
        let service = setup(channel.clone(), true).await;

        service
            .submit_export("p1", "u1", &to("owner@example.com"))
            .await
            .expect("export is queued");

        assert_eq!(channel.published().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_submissions_publish_duplicate_jobs() {
        let channel = InMemoryChannel::new();
        let service = setup(channel.clone(), true).await;

        for _ in 0..2 {
            service
                .submit_export("p1", "u1", &to("a@b.com"))
                .await
                .expect("export is queued");
        }

        let published = channel.published();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0], published[1]);
    }

    #[tokio::test]
    async fn failing_channel_still_reports_queued() {
        let channel = InMemoryChannel::failing();
        let service = setup(channel.clone(), true).await;

        for user in ["u1", "u2"] {
            let status = service
                .submit_export("p1", user, &to("a@b.com"))
                .await
                .expect("failure is not surfaced");
            assert_eq!(status, ExportStatus::Queued);
        }
        assert_eq!(channel.attempts(), 2);
        assert!(channel.published().is_empty());
    }

    #[tokio::test]
    async fn failing_channel_surfaces_when_degradation_is_off() {
        let channel = InMemoryChannel::failing();
        let service = setup(channel.clone(), false).await;

        let result = service.submit_export("p1", "u2", &to("a@b.com")).await;

        assert!(matches!(result, Err(PlaylistError::Channel(_))));
        assert_eq!(channel.attempts(), 1);
    }

    #[tokio::test]
    async fn unrelated_user_is_forbidden_without_publishing() {
        let channel = InMemoryChannel::new();
        let service = setup(channel.clone(), true).await;

        let result = service.submit_export("p1", "u3", &to("a@b.com")).await;

        assert!(matches!(result, Err(PlaylistError::Forbidden(_))));
        assert_eq!(channel.attempts(), 0);
    }

    #[tokio::test]
    async fn missing_playlist_is_not_found_not_forbidden() {
        let channel = InMemoryChannel::new();
        let service = setup(channel.clone(), true).await;

        for user in ["u1", "u3"] {
            let result = service.submit_export("missing", user, &to("a@b.com")).await;
            assert!(matches!(result, Err(PlaylistError::NotFound(_))));
        }
        assert_eq!(channel.attempts(), 0);
    }

    #[tokio::test]
    async fn invalid_email_is_rejected_before_access_check() {
        let channel = InMemoryChannel::new();
        let service = setup(channel.clone(), true).await;

        let malformed = service.submit_export("missing", "u3", &to("nope")).await;
        let missing = service
            .submit_export("p1", "u1", &ExportPlaylistRequest::default())
            .await;

        assert!(matches!(malformed, Err(PlaylistError::Validation(_))));
        assert!(matches!(missing, Err(PlaylistError::Validation(_))));
        assert_eq!(channel.attempts(), 0);
    }
}
