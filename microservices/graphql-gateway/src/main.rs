use std::sync::Arc;

use graphql_gateway::{GatewayConfig, GatewayService, SERVICE_ID};
use memberhub_core::{MemberhubError, MicroserviceRuntime, Result};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    memberhub_telemetry::init(SERVICE_ID).map_err(|e| MemberhubError::Internal(e.to_string()))?;

    info!("Starting GraphQL gateway");

    let config = GatewayConfig::from_env()?;
    let service = Arc::new(GatewayService::new(config).await?);
    MicroserviceRuntime::run(service).await
}
