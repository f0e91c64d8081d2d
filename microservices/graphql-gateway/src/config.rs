//! GraphQL Gateway Configuration

use memberhub_core::config::parse_flag;
use memberhub_core::{MemberhubError, Result, ServiceConfig};
use memberhub_store::PoolConfig;
use std::str::FromStr;

/// Which store implementation backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = MemberhubError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(MemberhubError::Config(format!(
                "Invalid STORE_BACKEND: {:?} (expected postgres or memory)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub service: ServiceConfig,
    pub store_backend: StoreBackend,
    pub pool: PoolConfig,
    pub run_migrations: bool,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        let service = ServiceConfig::from_env()?;
        let pool = PoolConfig {
            url: service.database_url.clone(),
            ..PoolConfig::from_env()?
        };

        Ok(Self {
            store_backend: std::env::var("STORE_BACKEND")
                .unwrap_or_else(|_| "postgres".to_string())
                .parse()?,
            run_migrations: match std::env::var("RUN_MIGRATIONS") {
                Ok(raw) => parse_flag("RUN_MIGRATIONS", &raw)?,
                Err(_) => true,
            },
            service,
            pool,
        })
    }

    /// In-memory configuration, used by tests and local demos
    pub fn in_memory(http_bind: std::net::SocketAddr) -> Self {
        Self {
            service: ServiceConfig {
                service_name: crate::SERVICE_ID.to_string(),
                http_bind,
                database_url: String::new(),
                log_level: "info".to_string(),
            },
            store_backend: StoreBackend::Memory,
            pool: PoolConfig::default(),
            run_migrations: false,
        }
    }
}
