pub mod admin;
pub mod identity;
pub mod import;
pub mod mapper;
pub mod model;
pub mod normalize;
pub mod page;
pub mod provider;
pub mod repository;
pub mod search;

pub use model::{Airport, Customer, Flight, Role};
pub use page::{Page, PageRequest, PAGE_SIZE};
pub use repository::{FlightQuery, RepositoryError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFoundError(String),
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
    #[error("Flight provider error: {0}")]
    ProviderError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
