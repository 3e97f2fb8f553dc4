use crate::config::AppConfig;
use crate::store::{DocumentStore, MemoryStore, PgDocumentStore};
use std::sync::Arc;

/// `DATABASE_URL` value selecting the in-process store instead of PostgreSQL.
pub const MEMORY_DATABASE_URL: &str = "memory:";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        if config.database_url == MEMORY_DATABASE_URL {
            tracing::warn!("using in-memory store; data is lost on shutdown");
            return Ok(Self::from_parts(Arc::new(MemoryStore::new()), Arc::new(config)));
        }

        let store = PgDocumentStore::connect(&config.database_url).await?;

        // Run migrations if present
        if let Err(e) = store.migrate().await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        Ok(Self::from_parts(Arc::new(store), Arc::new(config)))
    }

    pub fn from_parts(store: Arc<dyn DocumentStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            database_url: MEMORY_DATABASE_URL.into(),
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 60,
            },
            host: "127.0.0.1".into(),
            port: 0,
            allowed_origins: vec!["http://localhost:5173".into()],
            production: false,
        });

        Self::from_parts(Arc::new(MemoryStore::new()), config)
    }
}
