use async_trait::async_trait;
use flightdesk_shared::ProviderFlight;

use crate::CoreResult;

/// Source of generated flight batches for the scheduled import.
#[async_trait]
pub trait FlightProvider: Send + Sync {
    async fn one_way_flights(&self) -> CoreResult<Vec<ProviderFlight>>;

    /// Outbound legs, each carrying its inbound leg in `return_flight`.
    async fn round_trip_flights(&self) -> CoreResult<Vec<ProviderFlight>>;
}
