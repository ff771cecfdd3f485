use std::sync::Arc;

use flightdesk_core::admin::AdminService;
use flightdesk_core::identity::{AuthService, BcryptHasher};
use flightdesk_core::repository::{AirportRepository, CustomerRepository, FlightRepository};
use flightdesk_core::search::FlightSearchService;

use crate::auth::JwtTokens;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
    pub bcrypt_cost: u32,
}

#[derive(Clone)]
pub struct AppState {
    pub search: Arc<FlightSearchService>,
    pub admin: Arc<AdminService>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(
        flights: Arc<dyn FlightRepository>,
        airports: Arc<dyn AirportRepository>,
        customers: Arc<dyn CustomerRepository>,
        auth: &AuthConfig,
    ) -> Self {
        let tokens = Arc::new(JwtTokens::new(auth.secret.clone(), auth.expiration));
        let hasher = Arc::new(BcryptHasher::new(auth.bcrypt_cost));

        Self {
            search: Arc::new(FlightSearchService::new(flights.clone())),
            admin: Arc::new(AdminService::new(flights, airports)),
            auth: Arc::new(AuthService::new(customers, hasher, tokens)),
        }
    }
}
