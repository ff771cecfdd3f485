use std::sync::Arc;

use tracing::{error, info};

use crate::admin::AdminService;
use crate::provider::FlightProvider;
use crate::CoreResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub failed: usize,
}

/// One scheduled run: pull a one-way and a round-trip batch and persist them.
pub struct FlightImporter {
    provider: Arc<dyn FlightProvider>,
    admin: Arc<AdminService>,
}

impl FlightImporter {
    pub fn new(provider: Arc<dyn FlightProvider>, admin: Arc<AdminService>) -> Self {
        Self { provider, admin }
    }

    /// Per-flight failures are logged and counted; only a failed fetch aborts the run.
    pub async fn run_once(&self) -> CoreResult<ImportReport> {
        let mut report = ImportReport::default();

        let one_way = self.provider.one_way_flights().await?;
        let round_trips = self.provider.round_trip_flights().await?;
        info!("Provider returned {} one-way and {} round-trip flights", one_way.len(), round_trips.len());

        for flight in one_way.into_iter().chain(round_trips) {
            let outcome = match flight.into_round_trip() {
                Ok(trip) => self.admin.import_round_trip(&trip).await.map(|_| ()),
                Err(single) => self.admin.import_flight(&single).await.map(|_| ()),
            };

            match outcome {
                Ok(()) => report.imported += 1,
                Err(e) => {
                    error!("Failed to import provider flight: {}", e);
                    report.failed += 1;
                }
            }
        }

        info!("Flight import finished: {} imported, {} failed", report.imported, report.failed);
        Ok(report)
    }
}
