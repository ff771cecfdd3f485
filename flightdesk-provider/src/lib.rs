pub mod cities;
pub mod config;
pub mod generator;
pub mod routes;

pub use config::ProviderConfig;
pub use generator::{FlightGenerator, GeneratorError, Localization};
pub use routes::app;
