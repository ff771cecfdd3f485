use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use flightdesk_api::provider_client::HttpFlightProvider;
use flightdesk_api::worker::{start_import_worker, ImportSchedule};
use flightdesk_api::{app, AppState, AuthConfig};
use flightdesk_core::import::FlightImporter;
use flightdesk_core::repository::{AirportRepository, CustomerRepository, FlightRepository};
use flightdesk_store::app_config::{Config, StorageBackend};
use flightdesk_store::{
    DbClient, InMemoryStore, PostgresAirportRepository, PostgresCustomerRepository, PostgresFlightRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Repositories = (
    Arc<dyn FlightRepository>,
    Arc<dyn AirportRepository>,
    Arc<dyn CustomerRepository>,
);

async fn build_repositories(config: &Config) -> anyhow::Result<Repositories> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            let db = DbClient::new(&config.database.url, config.database.max_connections)
                .await
                .context("Failed to connect to Postgres")?;
            db.migrate().await.context("Failed to run migrations")?;

            let flights: Arc<dyn FlightRepository> = Arc::new(PostgresFlightRepository::new(db.pool.clone()));
            let airports: Arc<dyn AirportRepository> = Arc::new(PostgresAirportRepository::new(db.pool.clone()));
            let customers: Arc<dyn CustomerRepository> = Arc::new(PostgresCustomerRepository::new(db.pool));
            Ok((flights, airports, customers))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on shutdown");
            let store = Arc::new(InMemoryStore::new());
            let flights: Arc<dyn FlightRepository> = store.clone();
            let airports: Arc<dyn AirportRepository> = store.clone();
            let customers: Arc<dyn CustomerRepository> = store;
            Ok((flights, airports, customers))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flightdesk_api=debug,flightdesk_core=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting FlightDesk API on port {}", config.server.port);

    let (flights, airports, customers) = build_repositories(&config).await?;

    let state = AppState::new(
        flights,
        airports,
        customers,
        &AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
            bcrypt_cost: config.auth.bcrypt_cost,
        },
    );

    let created = state
        .auth
        .ensure_admin(&config.admin.username, &config.admin.password, &config.admin.email)
        .await
        .context("Failed to seed admin account")?;
    if created {
        tracing::info!("Created admin account '{}'", config.admin.username);
    }

    if config.scheduler.enabled {
        let schedule = ImportSchedule::parse(&config.scheduler.cron, &config.scheduler.timezone)?;
        let provider = HttpFlightProvider::new(
            &config.provider.base_url,
            &config.provider.localization,
            config.provider.timeout_seconds,
        )?;
        let importer = Arc::new(FlightImporter::new(Arc::new(provider), state.admin.clone()));
        tokio::spawn(start_import_worker(schedule, importer));
    } else {
        tracing::info!("Flight import scheduler disabled");
    }

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
