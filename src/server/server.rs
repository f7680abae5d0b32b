use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_postgres::*;
use crate::logger::*;
use crate::settings::Settings;
use crate::soap::EnvelopeRenderer;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

pub struct Server {
    pub lookup_service: Arc<dyn LookupService>,
    pub renderer: Arc<EnvelopeRenderer>,
    pool: Option<PgPool>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let db = &settings.database;

        let (user_repo, pool): (Arc<dyn UserRepo>, Option<PgPool>) = match db.backend.as_str() {
            "fake" => (
                Arc::new(MemoryUserRepo::with_records(db.fake_users.iter().cloned())),
                None,
            ),
            "real" => {
                let pool = connect_pool(db).await?;
                info!(host = %db.host, port = db.port, database = %db.name, "connected to PostgreSQL");
                (Arc::new(PgUserRepo::new(pool.clone())), Some(pool))
            }
            other => return Err(anyhow::anyhow!("Unknown database backend: {}", other)),
        };

        let query_timeout = db.query_timeout_secs.map(Duration::from_secs);
        let server = Self::from_repo(user_repo, query_timeout, settings.soap.escape_values);

        info!(backend = %db.backend, "server started");

        Ok(Self { pool, ..server })
    }

    /// Wires the service around an already built store.
    pub fn from_repo(
        user_repo: Arc<dyn UserRepo>,
        query_timeout: Option<Duration>,
        escape_values: bool,
    ) -> Self {
        let lookup_service: Arc<dyn LookupService> =
            Arc::new(RealLookupService::new(user_repo).with_query_timeout(query_timeout));

        Self {
            lookup_service,
            renderer: Arc::new(EnvelopeRenderer::new(escape_values)),
            pool: None,
        }
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        if let Some(pool) = &self.pool {
            pool.close().await;
            info!("database pool closed");
        }
    }
}

/// Binds and releases `address`, turning an unusable address into an error.
pub async fn ensure_bindable(address: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|e| anyhow::anyhow!("cannot bind {}: {}", address, e))?;
    drop(listener);
    Ok(())
}
