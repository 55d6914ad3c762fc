use anyhow::Result;
use tally_config::ServerConfig;
use tally_server::server::Server;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .compact()
        .init();

    let config = ServerConfig::from_env().inspect_err(|e| error!("Configuration error: {}", e))?;
    info!("Starting tally in {} mode", config.environment);

    let server = Server::bind(&config)
        .await
        .inspect_err(|e| error!("Failed to start server: {:#}", e))?;

    server.run().await
}
