//! In-memory message channel that records publishes and can be told to fail.

use super::client::MessageChannel;
use super::error::ChannelError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic: String,
    pub payload: String,
}

#[derive(Clone, Default)]
pub struct InMemoryChannel {
    published: Arc<Mutex<Vec<PublishedMessage>>>,
    attempts: Arc<Mutex<usize>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A channel whose every publish fails, as if the broker were down.
    #[must_use]
    pub fn failing() -> Self {
        let channel = Self::default();
        channel.set_failing(true);
        channel
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Messages that were published successfully.
    #[must_use]
    pub fn published(&self) -> Vec<PublishedMessage> {
        self.published
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Every publish call, successful or not.
    #[must_use]
    pub fn attempts(&self) -> usize {
        *self
            .attempts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl MessageChannel for InMemoryChannel {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), ChannelError> {
        *self
            .attempts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) += 1;

        if self.failing.load(Ordering::SeqCst) {
            return Err(ChannelError::Unavailable(sqlx::Error::PoolTimedOut));
        }

        self.published
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(PublishedMessage {
                topic: topic.to_owned(),
                payload: payload.to_owned(),
            });
        Ok(())
    }
}
