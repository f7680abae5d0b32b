use crate::settings::Database;
use anyhow::anyhow;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::time::Duration;

pub fn connect_options(db: &Database) -> anyhow::Result<PgConnectOptions> {
    let ssl_mode: PgSslMode = db
        .ssl_mode
        .parse()
        .map_err(|e| anyhow!("invalid ssl_mode {:?}: {}", db.ssl_mode, e))?;

    Ok(PgConnectOptions::new()
        .host(&db.host)
        .port(db.port)
        .username(&db.username)
        .password(&db.password)
        .database(&db.name)
        .ssl_mode(ssl_mode))
}

/// Opens the pool and proves it with one round trip.
pub async fn connect_pool(db: &Database) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(db.max_connections)
        .acquire_timeout(Duration::from_secs(db.acquire_timeout_secs))
        .connect_with(connect_options(db)?)
        .await
        .map_err(|e| anyhow!("error connecting to the database: {}", e))?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(|e| anyhow!("error pinging the database: {}", e))?;

    Ok(pool)
}
