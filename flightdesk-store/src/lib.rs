pub mod airport_repo;
pub mod app_config;
pub mod customer_repo;
pub mod database;
pub mod flight_repo;
pub mod memory;

pub use airport_repo::PostgresAirportRepository;
pub use customer_repo::PostgresCustomerRepository;
pub use database::DbClient;
pub use flight_repo::PostgresFlightRepository;
pub use memory::InMemoryStore;

use flightdesk_core::RepositoryError;

/// Maps driver errors onto the storage-agnostic repository error.
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::RowNotFound => RepositoryError::NotFound(err.to_string()),
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::UniqueViolation(db.message().to_string())
        }
        _ => RepositoryError::Database(err.to_string()),
    }
}
