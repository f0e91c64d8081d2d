//! Connection Pool for PostgreSQL

use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use memberhub_core::config::DEFAULT_DATABASE_URL;
use tokio_postgres::NoTls;
use tracing::{debug, info};

use crate::{Result, StoreError};

/// Pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub url: String,
    pub max_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_size: 16,
        }
    }
}

impl PoolConfig {
    pub fn from_env() -> Result<Self> {
        let max_size = match std::env::var("DATABASE_POOL_SIZE") {
            Ok(raw) => raw.parse().map_err(|e| {
                StoreError::Configuration(format!("Invalid DATABASE_POOL_SIZE: {}", e))
            })?,
            Err(_) => 16,
        };

        Ok(Self {
            url: std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            max_size,
        })
    }
}

/// PostgreSQL connection pool
#[derive(Clone)]
pub struct StorePool {
    pool: Pool,
}

impl StorePool {
    /// Create a new connection pool. Connections are opened lazily.
    pub fn new(config: &PoolConfig) -> Result<Self> {
        info!(max_size = config.max_size, "Creating PostgreSQL connection pool");

        let pg_config: tokio_postgres::Config = config
            .url
            .parse()
            .map_err(|e| StoreError::Configuration(format!("Invalid URL: {}", e)))?;

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = Manager::from_config(pg_config, NoTls, manager_config);

        let pool = Pool::builder(manager)
            .max_size(config.max_size)
            .build()
            .map_err(|e| StoreError::Pool(e.to_string()))?;

        debug!("PostgreSQL pool created successfully");

        Ok(Self { pool })
    }

    /// Get a connection from the pool
    pub async fn get(&self) -> Result<deadpool_postgres::Object> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::Pool(e.to_string()))
    }

    /// Check pool health
    pub async fn is_healthy(&self) -> bool {
        match self.pool.get().await {
            Ok(conn) => conn.simple_query("SELECT 1").await.is_ok(),
            Err(_) => false,
        }
    }
}
