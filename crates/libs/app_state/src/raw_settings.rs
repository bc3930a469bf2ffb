use serde::Deserialize;

/// Settings exactly as they appear in `config/settings.yaml` (plus `APP__` overrides).
#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub api: ApiSettings,
    pub logging: LoggingSettings,
    pub secrets: SecretSettings,
    pub database: DatabaseSettings,
    pub channel: RawChannelSettings,
    pub exports: ExportSettings,
}

/// Configuration for the API server.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub port: u32,
    pub allowed_origins: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    /// Fallback filter directive when `RUST_LOG` is not set.
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecretSettings {
    pub jwt: String,
    pub database_url: String,
}

/// Database connection pool configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub max_connections: u32,
    pub min_connection: u32,
    pub max_lifetime: u64,
    pub idle_timeout: u64,
    pub acquire_timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawChannelSettings {
    /// Connection string of the message channel. Falls back to `secrets.database_url`.
    #[serde(default)]
    pub url: Option<String>,
    pub max_connections: u32,
    pub connect_timeout_ms: u64,
    pub publish_timeout_ms: u64,
}

/// How export requests are handed off to the export worker.
#[derive(Debug, Deserialize, Clone)]
pub struct ExportSettings {
    /// Topic the export worker listens on.
    pub topic: String,
    /// When true, a failed publish is logged and the request still reports success.
    pub degrade_on_channel_failure: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            topic: "export:playlists".to_owned(),
            degrade_on_channel_failure: true,
        }
    }
}
