use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::env;
use std::time::Duration;

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Connect to Postgres with pool settings taken from the environment.
///
/// Defaults are sized for a small deployment: every request touches the
/// pool at most twice (listing plus reaction counts), so a handful of
/// connections goes a long way.
pub async fn get_database() -> Result<DatabaseConnection, DbErr> {
    let database_url = env::var("DATABASE_URL")
        .map_err(|_| DbErr::Custom("DATABASE_URL must be set".to_string()))?;

    let sqlx_logging = env::var("DB_SQLX_LOGGING")
        .map(|v| v == "true")
        .unwrap_or(false);

    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(env_u32("DB_MAX_CONNECTIONS", 8))
        .min_connections(env_u32("DB_MIN_CONNECTIONS", 1))
        .connect_timeout(Duration::from_secs(u64::from(env_u32(
            "DB_CONNECT_TIMEOUT_SECS",
            5,
        ))))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(sqlx_logging);

    Database::connect(opt).await
}
