pub mod auth;
pub mod envelope;
pub mod flight;
pub mod provider;
pub mod request;

pub use auth::{AuthResponse, LoginRequest, RegisterRequest};
pub use envelope::{ErrorMessage, ResponseEnvelope};
pub use flight::{AirportInfo, CreatedFlight, FlightInfo, FlightResponse, FlightsResponse};
pub use provider::{ProviderFlight, RoundTrip};
pub use request::{
    CreateAirportRequest, CreateFlightRequest, PriceRangeSearchRequest, SearchFullQualifiedRequest,
    UpdateAirportRequest, UpdateFlightRequest,
};
