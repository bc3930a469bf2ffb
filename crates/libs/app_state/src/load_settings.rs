use crate::{AppSettings, RawSettings};
use color_eyre::eyre::Result;
use std::path::Path;
use tracing::info;

/// Loads settings from `.env`, `config/settings.yaml` and `APP__` prefixed environment variables.
pub fn load_app_settings() -> Result<AppSettings> {
    // Load .env first so it can override values like the database url.
    dotenv::from_path(".env").ok();
    load_app_settings_from(Path::new("config/settings.yaml"))
}

pub fn load_app_settings_from(config_path: &Path) -> Result<AppSettings> {
    let config_path = config_path.canonicalize()?;
    info!("Loading settings from {}", config_path.display());

    let builder = config::Config::builder()
        .add_source(config::File::from(config_path))
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );

    let raw_settings = builder.build()?.try_deserialize::<RawSettings>()?;
    Ok(raw_settings.into())
}
