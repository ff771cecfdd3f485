use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use flightdesk_shared::{
    AirportInfo, CreateAirportRequest, CreateFlightRequest, CreatedFlight, FlightInfo, ProviderFlight,
    ResponseEnvelope, RoundTrip, UpdateAirportRequest, UpdateFlightRequest,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::mapper::{from_provider, to_airport_info, to_flight_info, to_flight_response};
use crate::model::{Airport, Flight};
use crate::normalize::normalize_city;
use crate::page::PageRequest;
use crate::repository::{AirportRepository, FlightQuery, FlightRepository};
use crate::search::{shape_page, FlightPage};
use crate::{CoreError, CoreResult};

/// Required fields of a flight leg after validation.
#[derive(Debug, Clone, PartialEq)]
struct ValidLeg {
    departure_airport: String,
    arrival_airport: String,
    departure_date: NaiveDate,
    departure_time: NaiveTime,
    return_date: Option<NaiveDate>,
    return_time: Option<NaiveTime>,
    price: f64,
}

fn required<T>(value: Option<T>, message: &str) -> CoreResult<T> {
    value.ok_or_else(|| CoreError::ValidationError(message.to_string()))
}

fn required_city(value: Option<&String>, message: &str) -> CoreResult<String> {
    let city = value
        .map(|s| normalize_city(s))
        .filter(|s| !s.is_empty());
    required(city, message)
}

#[allow(clippy::too_many_arguments)]
fn validate_leg(
    departure_airport: Option<&String>,
    arrival_airport: Option<&String>,
    departure_date: Option<NaiveDate>,
    departure_time: Option<NaiveTime>,
    return_date: Option<NaiveDate>,
    return_time: Option<NaiveTime>,
    price: f64,
) -> CoreResult<ValidLeg> {
    let departure_airport = required_city(departure_airport, "Departure Airport is required!")?;
    let arrival_airport = required_city(arrival_airport, "Arrival Airport is required!")?;
    let departure_date = required(departure_date, "Departure Date is required!")?;
    let departure_time = required(departure_time, "Departure Time is required!")?;

    // NaN fails as well
    if !(price > 0.0) {
        return Err(CoreError::ValidationError("Price must be greater than 0!".to_string()));
    }

    Ok(ValidLeg {
        departure_airport,
        arrival_airport,
        departure_date,
        departure_time,
        return_date,
        return_time,
        price,
    })
}

fn validate_create(request: &CreateFlightRequest) -> CoreResult<ValidLeg> {
    validate_leg(
        request.departure_airport.as_ref(),
        request.arrival_airport.as_ref(),
        request.departure_date,
        request.departure_time,
        request.return_date,
        request.return_time,
        request.price,
    )
}

fn validate_update(request: &UpdateFlightRequest) -> CoreResult<ValidLeg> {
    validate_leg(
        request.departure_airport.as_ref(),
        request.arrival_airport.as_ref(),
        request.departure_date,
        request.departure_time,
        request.return_date,
        request.return_time,
        request.price,
    )
}

/// Write path for flights and airports, shared by the admin endpoints and
/// the scheduled provider import.
pub struct AdminService {
    flights: Arc<dyn FlightRepository>,
    airports: Arc<dyn AirportRepository>,
}

impl AdminService {
    pub fn new(flights: Arc<dyn FlightRepository>, airports: Arc<dyn AirportRepository>) -> Self {
        Self { flights, airports }
    }

    async fn resolve_airport(&self, city: &str) -> CoreResult<Airport> {
        Ok(self.airports.find_or_create(&normalize_city(city)).await?)
    }

    async fn build_flight(&self, leg: ValidLeg, id: Uuid, return_flight_id: Option<Uuid>) -> CoreResult<Flight> {
        let departure_airport = self.resolve_airport(&leg.departure_airport).await?;
        let arrival_airport = self.resolve_airport(&leg.arrival_airport).await?;

        Ok(Flight {
            id,
            departure_airport,
            arrival_airport,
            departure_date: leg.departure_date,
            departure_time: leg.departure_time,
            return_date: leg.return_date,
            return_time: leg.return_time,
            price: leg.price,
            return_flight_id,
        })
    }

    // ========================================================================
    // Flights
    // ========================================================================

    /// Validates both legs before touching storage, so an invalid return leg
    /// leaves nothing behind.
    pub async fn create_flight(&self, request: &CreateFlightRequest) -> CoreResult<ResponseEnvelope<CreatedFlight>> {
        let outbound_leg = validate_create(request)?;

        let Some(return_request) = request.return_flight.as_deref() else {
            let flight = self.build_flight(outbound_leg, Uuid::new_v4(), None).await?;
            let saved = self.flights.save(&flight).await?;
            info!("Created flight {} ({} -> {})", saved.id, saved.departure_airport.city, saved.arrival_airport.city);
            return Ok(ResponseEnvelope::success(CreatedFlight::OneWay(to_flight_info(&saved))));
        };

        if return_request.return_flight.is_some() {
            return Err(CoreError::ValidationError(
                "Return flight cannot have its own return flight!".to_string(),
            ));
        }
        let return_leg = validate_create(return_request)?;

        let inbound = self.build_flight(return_leg, Uuid::new_v4(), None).await?;
        let outbound = self.build_flight(outbound_leg, Uuid::new_v4(), Some(inbound.id)).await?;
        let (outbound, inbound) = self.flights.save_round_trip(&outbound, &inbound).await?;
        info!("Created round trip {} with return leg {}", outbound.id, inbound.id);

        Ok(ResponseEnvelope::success(CreatedFlight::RoundTrip(to_flight_response(
            &outbound,
            Some(&inbound),
        ))))
    }

    /// Replaces every mutable field; the id survives. The return-leg link
    /// survives only while the flight still has a return date.
    pub async fn update_flight(&self, request: &UpdateFlightRequest) -> CoreResult<ResponseEnvelope<FlightInfo>> {
        let id = request
            .id
            .ok_or_else(|| CoreError::NotFoundError("Flight Not Found!".to_string()))?;
        let leg = validate_update(request)?;

        let existing = self
            .flights
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFoundError("Flight Not Found!".to_string()))?;

        let return_flight_id = match (existing.return_flight_id, leg.return_date) {
            (Some(linked), None) => {
                info!("Flight {} no longer returns, unlinking return leg {}", id, linked);
                None
            }
            (linked, _) => linked,
        };

        let flight = self.build_flight(leg, existing.id, return_flight_id).await?;
        let saved = self.flights.save(&flight).await?;
        info!("Updated flight {}", saved.id);

        Ok(ResponseEnvelope::success(to_flight_info(&saved)))
    }

    pub async fn delete_flight(&self, id: Uuid) -> CoreResult<ResponseEnvelope<String>> {
        if self.flights.find_by_id(id).await?.is_none() {
            return Err(CoreError::NotFoundError("Flight Not Found!".to_string()));
        }

        self.flights.delete(id).await?;
        info!("Deleted flight {}", id);

        Ok(ResponseEnvelope::success(format!("{} removed successfully!", id)))
    }

    pub async fn list_flights(&self, page: u32) -> CoreResult<FlightPage> {
        let request = PageRequest::new(page)?;
        let found = self.flights.search(&FlightQuery::All, request).await?;
        shape_page(self.flights.as_ref(), found).await
    }

    // ========================================================================
    // Airports
    // ========================================================================

    /// Returns the existing airport when the normalized city is already known.
    pub async fn create_airport(&self, request: &CreateAirportRequest) -> CoreResult<ResponseEnvelope<AirportInfo>> {
        let city = required_city(request.city.as_ref(), "City is required!")?;
        let airport = self.airports.find_or_create(&city).await?;
        debug!("Airport {} resolved to {}", city, airport.id);

        Ok(ResponseEnvelope::success(to_airport_info(&airport)))
    }

    pub async fn update_airport(&self, request: &UpdateAirportRequest) -> CoreResult<ResponseEnvelope<AirportInfo>> {
        let city = required_city(request.city.as_ref(), "City is required!")?;
        let id = request
            .id
            .ok_or_else(|| CoreError::NotFoundError("Airport Not Found!".to_string()))?;

        let mut airport = self
            .airports
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFoundError("Airport Not Found!".to_string()))?;

        if let Some(other) = self.airports.find_by_city(&city).await? {
            if other.id != airport.id {
                return Err(CoreError::ValidationError(format!("Airport {} already exists!", city)));
            }
        }

        airport.city = city;
        let saved = self.airports.save(&airport).await?;
        info!("Renamed airport {} to {}", saved.id, saved.city);

        Ok(ResponseEnvelope::success(to_airport_info(&saved)))
    }

    /// Refuses to delete an airport that flights still reference.
    pub async fn delete_airport(&self, city: &str) -> CoreResult<ResponseEnvelope<String>> {
        let city = normalize_city(city);
        let airport = self
            .airports
            .find_by_city(&city)
            .await?
            .ok_or_else(|| CoreError::NotFoundError("Airport Not Found!".to_string()))?;

        let in_use = self.flights.count_by_airport(airport.id).await?;
        if in_use > 0 {
            return Err(CoreError::ValidationError(format!(
                "Airport {} is used by {} flight(s)!",
                airport.city, in_use
            )));
        }

        self.airports.delete(airport.id).await?;
        info!("Deleted airport {} ({})", airport.id, airport.city);

        Ok(ResponseEnvelope::success(format!("{} removed successfully!", airport.id)))
    }

    pub async fn list_airports(&self, page: u32) -> CoreResult<ResponseEnvelope<Vec<AirportInfo>>> {
        let request = PageRequest::new(page)?;
        let found = self.airports.find_all(request).await?;
        let total_pages = found.total_pages();
        let airports: Vec<AirportInfo> = found.content.iter().map(to_airport_info).collect();

        Ok(ResponseEnvelope::paged(request.page, total_pages, airports.len() as u32, airports))
    }

    // ========================================================================
    // Provider import (trusted input, no interactive validation)
    // ========================================================================

    pub async fn import_flight(&self, dto: &ProviderFlight) -> CoreResult<Flight> {
        let departure = self.resolve_airport(&dto.departure_airport).await?;
        let arrival = self.resolve_airport(&dto.arrival_airport).await?;
        let flight = from_provider(dto, departure, arrival, None);

        Ok(self.flights.save(&flight).await?)
    }

    /// Both legs land in one unit of work; no return-only orphan can remain.
    pub async fn import_round_trip(&self, trip: &RoundTrip) -> CoreResult<(Flight, Flight)> {
        let inbound = from_provider(
            &trip.inbound,
            self.resolve_airport(&trip.inbound.departure_airport).await?,
            self.resolve_airport(&trip.inbound.arrival_airport).await?,
            None,
        );
        let outbound = from_provider(
            &trip.outbound,
            self.resolve_airport(&trip.outbound.departure_airport).await?,
            self.resolve_airport(&trip.outbound.arrival_airport).await?,
            Some(inbound.id),
        );

        Ok(self.flights.save_round_trip(&outbound, &inbound).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;
    use crate::repository::RepoResult;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn valid_request() -> CreateFlightRequest {
        CreateFlightRequest {
            departure_airport: Some("İstanbul".to_string()),
            arrival_airport: Some("Ankara".to_string()),
            departure_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            departure_time: NaiveTime::from_hms_opt(10, 0, 0),
            price: 250.0,
            ..Default::default()
        }
    }

    fn message(result: CoreResult<ValidLeg>) -> String {
        match result {
            Err(CoreError::ValidationError(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_leg_normalizes_cities() {
        let leg = validate_create(&valid_request()).unwrap();
        assert_eq!(leg.departure_airport, "ISTANBUL");
        assert_eq!(leg.arrival_airport, "ANKARA");
    }

    #[test]
    fn test_each_required_field_has_its_message() {
        let mut r = valid_request();
        r.departure_airport = None;
        assert_eq!(message(validate_create(&r)), "Departure Airport is required!");

        let mut r = valid_request();
        r.arrival_airport = Some("   ".to_string());
        assert_eq!(message(validate_create(&r)), "Arrival Airport is required!");

        let mut r = valid_request();
        r.departure_date = None;
        assert_eq!(message(validate_create(&r)), "Departure Date is required!");

        let mut r = valid_request();
        r.departure_time = None;
        assert_eq!(message(validate_create(&r)), "Departure Time is required!");
    }

    #[test]
    fn test_price_must_be_positive() {
        for price in [0.0, -5.0, f64::NAN] {
            let mut r = valid_request();
            r.price = price;
            assert_eq!(message(validate_create(&r)), "Price must be greater than 0!");
        }
    }

    // ------------------------------------------------------------------------
    // Service behaviour over an in-test store
    // ------------------------------------------------------------------------

    #[derive(Default)]
    struct FakeStore {
        flights: Mutex<Vec<Flight>>,
        airports: Mutex<Vec<Airport>>,
    }

    #[async_trait]
    impl FlightRepository for FakeStore {
        async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Flight>> {
            Ok(self.flights.lock().unwrap().iter().find(|f| f.id == id).cloned())
        }

        async fn find_by_ids(&self, ids: &[Uuid]) -> RepoResult<Vec<Flight>> {
            Ok(self.flights.lock().unwrap().iter().filter(|f| ids.contains(&f.id)).cloned().collect())
        }

        async fn search(&self, query: &FlightQuery, page: PageRequest) -> RepoResult<Page<Flight>> {
            let matched = self.flights.lock().unwrap().iter().filter(|f| query.matches(f)).cloned().collect();
            Ok(Page::slice(matched, page))
        }

        async fn save(&self, flight: &Flight) -> RepoResult<Flight> {
            let mut flights = self.flights.lock().unwrap();
            flights.retain(|f| f.id != flight.id);
            flights.push(flight.clone());
            Ok(flight.clone())
        }

        async fn save_round_trip(&self, outbound: &Flight, inbound: &Flight) -> RepoResult<(Flight, Flight)> {
            let mut flights = self.flights.lock().unwrap();
            flights.push(inbound.clone());
            flights.push(outbound.clone());
            Ok((outbound.clone(), inbound.clone()))
        }

        async fn delete(&self, id: Uuid) -> RepoResult<()> {
            self.flights.lock().unwrap().retain(|f| f.id != id);
            Ok(())
        }

        async fn count_by_airport(&self, airport_id: Uuid) -> RepoResult<u64> {
            let flights = self.flights.lock().unwrap();
            Ok(flights
                .iter()
                .filter(|f| f.departure_airport.id == airport_id || f.arrival_airport.id == airport_id)
                .count() as u64)
        }
    }

    #[async_trait]
    impl AirportRepository for FakeStore {
        async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Airport>> {
            Ok(self.airports.lock().unwrap().iter().find(|a| a.id == id).cloned())
        }

        async fn find_by_city(&self, city: &str) -> RepoResult<Option<Airport>> {
            Ok(self.airports.lock().unwrap().iter().find(|a| a.city == city).cloned())
        }

        async fn find_or_create(&self, city: &str) -> RepoResult<Airport> {
            let mut airports = self.airports.lock().unwrap();
            if let Some(existing) = airports.iter().find(|a| a.city == city) {
                return Ok(existing.clone());
            }
            let airport = Airport::new(city);
            airports.push(airport.clone());
            Ok(airport)
        }

        async fn find_all(&self, page: PageRequest) -> RepoResult<Page<Airport>> {
            Ok(Page::slice(self.airports.lock().unwrap().clone(), page))
        }

        async fn save(&self, airport: &Airport) -> RepoResult<Airport> {
            let mut airports = self.airports.lock().unwrap();
            airports.retain(|a| a.id != airport.id);
            airports.push(airport.clone());
            Ok(airport.clone())
        }

        async fn delete(&self, id: Uuid) -> RepoResult<()> {
            self.airports.lock().unwrap().retain(|a| a.id != id);
            Ok(())
        }
    }

    fn service() -> (AdminService, Arc<FakeStore>) {
        let store = Arc::new(FakeStore::default());
        (AdminService::new(store.clone(), store.clone()), store)
    }

    fn update_of(info: &FlightInfo) -> UpdateFlightRequest {
        UpdateFlightRequest {
            id: Some(info.flight_number),
            departure_airport: Some(info.from.clone()),
            arrival_airport: Some(info.to.clone()),
            departure_date: Some(info.departure_date),
            departure_time: Some(info.departure_time),
            return_date: info.return_date,
            return_time: info.return_time,
            price: info.price,
        }
    }

    async fn create_round_trip(admin: &AdminService) -> (FlightInfo, FlightInfo) {
        let mut request = valid_request();
        request.return_date = NaiveDate::from_ymd_opt(2024, 2, 15);
        request.return_time = NaiveTime::from_hms_opt(18, 0, 0);
        let mut back = valid_request();
        back.departure_airport = Some("Ankara".to_string());
        back.arrival_airport = Some("İstanbul".to_string());
        back.departure_date = NaiveDate::from_ymd_opt(2024, 2, 15);
        request.return_flight = Some(Box::new(back));

        match admin.create_flight(&request).await.unwrap().data {
            CreatedFlight::RoundTrip(r) => (r.departure, r.return_flight.unwrap()),
            CreatedFlight::OneWay(_) => panic!("expected a round trip"),
        }
    }

    #[tokio::test]
    async fn test_update_flight_keeps_identity_and_link() {
        let (admin, store) = service();
        let (outbound, inbound) = create_round_trip(&admin).await;

        let mut request = update_of(&outbound);
        request.arrival_airport = Some("izmir".to_string());
        request.price = 310.0;
        let updated = admin.update_flight(&request).await.unwrap().data;

        assert_eq!(updated.flight_number, outbound.flight_number);
        assert_eq!(updated.to, "IZMIR");
        assert_eq!(updated.price, 310.0);
        let stored = FlightRepository::find_by_id(store.as_ref(), outbound.flight_number).await.unwrap().unwrap();
        assert_eq!(stored.return_flight_id, Some(inbound.flight_number));
    }

    #[tokio::test]
    async fn test_update_flight_dropping_return_date_unlinks_return_leg() {
        let (admin, store) = service();
        let (outbound, _) = create_round_trip(&admin).await;

        let mut request = update_of(&outbound);
        request.return_date = None;
        request.return_time = None;
        admin.update_flight(&request).await.unwrap();

        let stored = FlightRepository::find_by_id(store.as_ref(), outbound.flight_number).await.unwrap().unwrap();
        assert_eq!(stored.return_flight_id, None);
    }

    #[tokio::test]
    async fn test_update_flight_rejects_unknown_id_and_invalid_leg() {
        let (admin, _) = service();
        let (outbound, _) = create_round_trip(&admin).await;

        let mut unknown = update_of(&outbound);
        unknown.id = Some(Uuid::new_v4());
        assert!(matches!(
            admin.update_flight(&unknown).await,
            Err(CoreError::NotFoundError(msg)) if msg == "Flight Not Found!"
        ));

        let mut missing = update_of(&outbound);
        missing.id = None;
        assert!(matches!(admin.update_flight(&missing).await, Err(CoreError::NotFoundError(_))));

        let mut free = update_of(&outbound);
        free.price = 0.0;
        assert!(matches!(
            admin.update_flight(&free).await,
            Err(CoreError::ValidationError(msg)) if msg == "Price must be greater than 0!"
        ));
    }

    #[tokio::test]
    async fn test_update_airport_renames_and_refuses_collisions() {
        let (admin, _) = service();
        let van = admin
            .create_airport(&CreateAirportRequest { city: Some("Van".to_string()) })
            .await
            .unwrap()
            .data;
        admin
            .create_airport(&CreateAirportRequest { city: Some("Kars".to_string()) })
            .await
            .unwrap();

        let renamed = admin
            .update_airport(&UpdateAirportRequest { id: Some(van.id), city: Some("Muş".to_string()) })
            .await
            .unwrap()
            .data;
        assert_eq!(renamed.id, van.id);
        assert_eq!(renamed.city, "MUS");

        let collision = admin
            .update_airport(&UpdateAirportRequest { id: Some(van.id), city: Some("kars".to_string()) })
            .await;
        assert!(matches!(
            collision,
            Err(CoreError::ValidationError(msg)) if msg == "Airport KARS already exists!"
        ));

        let unknown = admin
            .update_airport(&UpdateAirportRequest { id: Some(Uuid::new_v4()), city: Some("Rize".to_string()) })
            .await;
        assert!(matches!(unknown, Err(CoreError::NotFoundError(_))));
    }
}
