use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use flightdesk_provider::{app, FlightGenerator, ProviderConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flightdesk_provider=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ProviderConfig::load().context("Failed to load provider config")?;
    let port = config.port;
    let generator = FlightGenerator::new(config).context("Invalid generator settings")?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Flight provider listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(Arc::new(generator))).await?;

    Ok(())
}
