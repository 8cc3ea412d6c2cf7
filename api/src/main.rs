use anyhow::Result;
use dotenv::dotenv;

use api::{config::AppConfig, observability, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    // Invalid configuration aborts here, before anything binds
    let config = AppConfig::from_env()?;
    observability::init(&config)?;

    let app = api::app(AppState::new());

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server is running on port {} ({})", config.port, config.node_env);

    axum::serve(listener, app).await?;

    Ok(())
}
