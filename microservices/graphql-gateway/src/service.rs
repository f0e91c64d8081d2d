//! Gateway service lifecycle

use std::sync::Arc;

use async_trait::async_trait;
use memberhub_core::{HealthStatus, MemberhubService, ReadinessStatus, Result};
use memberhub_store::{MemoryStore, PgStore, StoreHandle, StorePool};
use tracing::info;

use crate::config::{GatewayConfig, StoreBackend};
use crate::engine::{build_schema, QueryEngine};
use crate::routes::{router, AppState};
use crate::SERVICE_ID;

pub struct GatewayService {
    config: GatewayConfig,
    state: AppState,
}

impl GatewayService {
    pub async fn new(config: GatewayConfig) -> Result<Self> {
        let store = open_store(&config).await?;
        let engine = QueryEngine::new(build_schema(), store);

        Ok(Self {
            config,
            state: AppState::new(engine),
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn open_store(config: &GatewayConfig) -> Result<StoreHandle> {
    let store: StoreHandle = match config.store_backend {
        StoreBackend::Memory => {
            info!("Using in-memory store");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Postgres => {
            let pool = StorePool::new(&config.pool)?;
            let store = PgStore::new(pool);
            if config.run_migrations {
                store.migrate().await?;
            }
            info!("Using PostgreSQL store");
            Arc::new(store)
        }
    };
    Ok(store)
}

#[async_trait]
impl MemberhubService for GatewayService {
    fn service_id(&self) -> &'static str {
        SERVICE_ID
    }

    async fn health(&self) -> HealthStatus {
        self.state.health()
    }

    async fn ready(&self) -> ReadinessStatus {
        self.state.readiness().await
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutting down GraphQL gateway");
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        info!(
            http = %self.config.service.http_bind,
            "Starting GraphQL gateway server"
        );

        let app = router(self.state.clone());
        let listener = tokio::net::TcpListener::bind(self.config.service.http_bind).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
