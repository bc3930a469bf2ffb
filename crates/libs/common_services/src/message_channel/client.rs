use super::error::ChannelError;
use app_state::ChannelSettings;
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

/// Publish primitive towards the export worker's broker.
///
/// One call is one best-effort attempt: no retries, no buffering.
#[async_trait]
pub trait MessageChannel: Send + Sync {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), ChannelError>;
}

/// Message channel on top of Postgres.
///
/// Each message is appended to the `channel_message` outbox and announced with `pg_notify` in the
/// same transaction, so a worker can either `LISTEN` on the topic or drain the outbox.
/// The connection pool is created on first use and shared by every publish afterwards.
pub struct PgMessageChannel {
    url: String,
    max_connections: u32,
    connect_timeout: Duration,
    publish_timeout: Duration,
    pool: OnceCell<PgPool>,
}

impl PgMessageChannel {
    #[must_use]
    pub fn new(settings: &ChannelSettings) -> Self {
        Self {
            url: settings.url.clone(),
            max_connections: settings.max_connections,
            connect_timeout: settings.connect_timeout(),
            publish_timeout: settings.publish_timeout(),
            pool: OnceCell::new(),
        }
    }

    /// A failed connect is not cached; the next publish tries again.
    async fn pool(&self) -> Result<&PgPool, ChannelError> {
        self.pool
            .get_or_try_init(|| async {
                info!("Connecting message channel.");
                PgPoolOptions::new()
                    .max_connections(self.max_connections.max(1))
                    .acquire_timeout(self.connect_timeout)
                    .connect(&self.url)
                    .await
                    .map_err(ChannelError::Unavailable)
            })
            .await
    }

    async fn publish_once(&self, topic: &str, payload: &str) -> Result<(), ChannelError> {
        let write_error = |source: sqlx::Error| ChannelError::Write {
            topic: topic.to_owned(),
            source,
        };

        let pool = self.pool().await?;
        let mut tx = pool.begin().await.map_err(write_error)?;

        sqlx::query("INSERT INTO channel_message (topic, payload) VALUES ($1, $2)")
            .bind(topic)
            .bind(payload)
            .execute(&mut *tx)
            .await
            .map_err(write_error)?;

        sqlx::query("SELECT pg_notify($1, $2)")
            .bind(topic)
            .bind(payload)
            .execute(&mut *tx)
            .await
            .map_err(write_error)?;

        tx.commit().await.map_err(write_error)?;
        Ok(())
    }
}

#[async_trait]
impl MessageChannel for PgMessageChannel {
    #[instrument(skip(self, payload))]
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), ChannelError> {
        tokio::time::timeout(self.publish_timeout, self.publish_once(topic, payload))
            .await
            .map_err(|_| ChannelError::Timeout {
                topic: topic.to_owned(),
                timeout: self.publish_timeout,
            })??;

        debug!("Published {} bytes to {}", payload.len(), topic);
        Ok(())
    }
}
