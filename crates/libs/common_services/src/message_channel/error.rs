use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("Message channel unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    #[error("Publishing to {topic} failed: {source}")]
    Write {
        topic: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Publishing to {topic} timed out after {timeout:?}")]
    Timeout { topic: String, timeout: Duration },
}
