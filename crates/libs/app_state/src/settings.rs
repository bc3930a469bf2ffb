use crate::{
    ApiSettings, DatabaseSettings, ExportSettings, LoggingSettings, RawSettings, SecretSettings,
};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub api: ApiSettings,
    pub logging: LoggingSettings,
    pub secrets: SecretSettings,
    pub database: DatabaseSettings,
    pub channel: ChannelSettings,
    pub exports: ExportSettings,
}

/// Message channel settings with the connection string resolved.
#[derive(Debug, Deserialize, Clone)]
pub struct ChannelSettings {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_ms: u64,
    pub publish_timeout_ms: u64,
}

impl ChannelSettings {
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    #[must_use]
    pub const fn publish_timeout(&self) -> Duration {
        Duration::from_millis(self.publish_timeout_ms)
    }
}

impl From<RawSettings> for AppSettings {
    fn from(raw: RawSettings) -> Self {
        let channel_url = raw
            .channel
            .url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| raw.secrets.database_url.clone());

        Self {
            api: raw.api,
            logging: raw.logging,
            channel: ChannelSettings {
                url: channel_url,
                max_connections: raw.channel.max_connections,
                connect_timeout_ms: raw.channel.connect_timeout_ms,
                publish_timeout_ms: raw.channel.publish_timeout_ms,
            },
            secrets: raw.secrets,
            database: raw.database,
            exports: raw.exports,
        }
    }
}
