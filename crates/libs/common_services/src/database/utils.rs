use app_state::DatabaseSettings;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::info;

/// Connects the catalog database pool and runs pending migrations.
///
/// # Errors
///
/// * `PgPool::connect` can return an error if the database connection fails.
/// * `sqlx::migrate` can return an error if migrations fail.
pub async fn get_db_pool(
    database_url: &str,
    db_settings: &DatabaseSettings,
) -> color_eyre::Result<Pool<Postgres>> {
    info!("Connecting to database.");
    let pool = PgPoolOptions::new()
        .max_connections(db_settings.max_connections)
        .min_connections(db_settings.min_connection)
        .max_lifetime(Duration::from_secs(db_settings.max_lifetime))
        .idle_timeout(Duration::from_secs(db_settings.idle_timeout))
        .acquire_timeout(Duration::from_secs(db_settings.acquire_timeout))
        .test_before_acquire(true)
        .connect(database_url)
        .await?;

    info!("Running migrations.");
    sqlx::migrate!("../../../migrations").run(&pool).await?;

    Ok(pool)
}
