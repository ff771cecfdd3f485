use std::time::Duration;

use async_trait::async_trait;
use flightdesk_core::provider::FlightProvider;
use flightdesk_core::{CoreError, CoreResult};
use flightdesk_shared::ProviderFlight;
use tracing::debug;

/// Talks to the flight generator service over HTTP.
pub struct HttpFlightProvider {
    client: reqwest::Client,
    base_url: String,
    localization: String,
}

impl HttpFlightProvider {
    pub fn new(base_url: &str, localization: &str, timeout_seconds: u64) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| CoreError::ProviderError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            localization: localization.to_string(),
        })
    }

    fn url(&self, kind: &str) -> String {
        format!(
            "{}/api/generator/flight/generate/{}/{}",
            self.base_url, kind, self.localization
        )
    }

    async fn fetch(&self, kind: &str) -> CoreResult<Vec<ProviderFlight>> {
        let url = self.url(kind);
        debug!("Fetching provider flights from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoreError::ProviderError(format!("GET {} failed: {}", url, e)))?
            .error_for_status()
            .map_err(|e| CoreError::ProviderError(format!("GET {} returned error: {}", url, e)))?;

        response
            .json::<Vec<ProviderFlight>>()
            .await
            .map_err(|e| CoreError::ProviderError(format!("Malformed provider payload: {}", e)))
    }
}

#[async_trait]
impl FlightProvider for HttpFlightProvider {
    async fn one_way_flights(&self) -> CoreResult<Vec<ProviderFlight>> {
        self.fetch("one-way").await
    }

    async fn round_trip_flights(&self) -> CoreResult<Vec<ProviderFlight>> {
        self.fetch("round").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        let provider = HttpFlightProvider::new("http://localhost:8081/", "tr", 5).unwrap();
        assert_eq!(provider.url("round"), "http://localhost:8081/api/generator/flight/generate/round/tr");
        assert_eq!(provider.url("one-way"), "http://localhost:8081/api/generator/flight/generate/one-way/tr");
    }
}
