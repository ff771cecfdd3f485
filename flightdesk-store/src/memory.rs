//! Arena-backed store implementing every repository trait in process memory.
//!
//! Flights keep their airports and return leg as ids into the arena, so an
//! airport rename is visible through every flight that references it.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use flightdesk_core::model::{Airport, Customer, Flight};
use flightdesk_core::page::{Page, PageRequest};
use flightdesk_core::repository::{
    AirportRepository, CustomerRepository, FlightQuery, FlightRepository, RepoResult, RepositoryError,
};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct FlightRecord {
    id: Uuid,
    departure_airport_id: Uuid,
    arrival_airport_id: Uuid,
    departure_date: NaiveDate,
    departure_time: NaiveTime,
    return_date: Option<NaiveDate>,
    return_time: Option<NaiveTime>,
    price: f64,
    return_flight_id: Option<Uuid>,
}

impl FlightRecord {
    fn from_flight(flight: &Flight) -> Self {
        Self {
            id: flight.id,
            departure_airport_id: flight.departure_airport.id,
            arrival_airport_id: flight.arrival_airport.id,
            departure_date: flight.departure_date,
            departure_time: flight.departure_time,
            return_date: flight.return_date,
            return_time: flight.return_time,
            price: flight.price,
            return_flight_id: flight.return_flight_id,
        }
    }
}

#[derive(Debug, Default)]
struct Arena {
    // insertion order doubles as storage order
    airports: Vec<Airport>,
    flights: Vec<FlightRecord>,
    customers: Vec<Customer>,
}

impl Arena {
    fn airport(&self, id: Uuid) -> RepoResult<&Airport> {
        self.airports
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| RepositoryError::Database(format!("flight references missing airport {}", id)))
    }

    fn resolve(&self, record: &FlightRecord) -> RepoResult<Flight> {
        Ok(Flight {
            id: record.id,
            departure_airport: self.airport(record.departure_airport_id)?.clone(),
            arrival_airport: self.airport(record.arrival_airport_id)?.clone(),
            departure_date: record.departure_date,
            departure_time: record.departure_time,
            return_date: record.return_date,
            return_time: record.return_time,
            price: record.price,
            return_flight_id: record.return_flight_id,
        })
    }

    fn check_references(&self, flight: &Flight) -> RepoResult<()> {
        self.airport(flight.departure_airport.id)?;
        self.airport(flight.arrival_airport.id)?;
        Ok(())
    }

    fn upsert_flight(&mut self, flight: &Flight) {
        let record = FlightRecord::from_flight(flight);
        match self.flights.iter_mut().find(|f| f.id == flight.id) {
            Some(existing) => *existing = record,
            None => self.flights.push(record),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    arena: RwLock<Arena>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlightRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Flight>> {
        let arena = self.arena.read().await;
        arena
            .flights
            .iter()
            .find(|f| f.id == id)
            .map(|f| arena.resolve(f))
            .transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> RepoResult<Vec<Flight>> {
        let arena = self.arena.read().await;
        arena
            .flights
            .iter()
            .filter(|f| ids.contains(&f.id))
            .map(|f| arena.resolve(f))
            .collect()
    }

    async fn search(&self, query: &FlightQuery, page: PageRequest) -> RepoResult<Page<Flight>> {
        let arena = self.arena.read().await;
        let mut matched = Vec::new();
        for record in &arena.flights {
            let flight = arena.resolve(record)?;
            if query.matches(&flight) {
                matched.push(flight);
            }
        }

        if query.orders_by_price() {
            // stable, so equal prices keep storage order
            matched.sort_by(|a, b| a.price.total_cmp(&b.price));
        }

        Ok(Page::slice(matched, page))
    }

    async fn save(&self, flight: &Flight) -> RepoResult<Flight> {
        let mut arena = self.arena.write().await;
        arena.check_references(flight)?;
        arena.upsert_flight(flight);
        Ok(flight.clone())
    }

    async fn save_round_trip(&self, outbound: &Flight, inbound: &Flight) -> RepoResult<(Flight, Flight)> {
        let mut arena = self.arena.write().await;
        // validate both before writing either
        arena.check_references(inbound)?;
        arena.check_references(outbound)?;
        arena.upsert_flight(inbound);
        arena.upsert_flight(outbound);
        Ok((outbound.clone(), inbound.clone()))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut arena = self.arena.write().await;
        let return_flight_id = arena
            .flights
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("flight {}", id)))?
            .return_flight_id;

        for record in arena.flights.iter_mut() {
            if record.return_flight_id == Some(id) {
                record.return_flight_id = None;
            }
        }
        arena
            .flights
            .retain(|f| f.id != id && Some(f.id) != return_flight_id);
        Ok(())
    }

    async fn count_by_airport(&self, airport_id: Uuid) -> RepoResult<u64> {
        let arena = self.arena.read().await;
        Ok(arena
            .flights
            .iter()
            .filter(|f| f.departure_airport_id == airport_id || f.arrival_airport_id == airport_id)
            .count() as u64)
    }
}

#[async_trait]
impl AirportRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Airport>> {
        let arena = self.arena.read().await;
        Ok(arena.airports.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_city(&self, city: &str) -> RepoResult<Option<Airport>> {
        let arena = self.arena.read().await;
        Ok(arena.airports.iter().find(|a| a.city == city).cloned())
    }

    async fn find_or_create(&self, city: &str) -> RepoResult<Airport> {
        // lookup and insert under one write lock
        let mut arena = self.arena.write().await;
        if let Some(existing) = arena.airports.iter().find(|a| a.city == city) {
            return Ok(existing.clone());
        }
        let airport = Airport::new(city);
        arena.airports.push(airport.clone());
        Ok(airport)
    }

    async fn find_all(&self, page: PageRequest) -> RepoResult<Page<Airport>> {
        let arena = self.arena.read().await;
        let mut airports = arena.airports.clone();
        airports.sort_by(|a, b| a.city.cmp(&b.city));
        Ok(Page::slice(airports, page))
    }

    async fn save(&self, airport: &Airport) -> RepoResult<Airport> {
        let mut arena = self.arena.write().await;
        if arena.airports.iter().any(|a| a.city == airport.city && a.id != airport.id) {
            return Err(RepositoryError::UniqueViolation(format!("airport city {}", airport.city)));
        }
        match arena.airports.iter_mut().find(|a| a.id == airport.id) {
            Some(existing) => *existing = airport.clone(),
            None => arena.airports.push(airport.clone()),
        }
        Ok(airport.clone())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut arena = self.arena.write().await;
        if arena
            .flights
            .iter()
            .any(|f| f.departure_airport_id == id || f.arrival_airport_id == id)
        {
            return Err(RepositoryError::Database(format!("airport {} is still referenced", id)));
        }
        let before = arena.airports.len();
        arena.airports.retain(|a| a.id != id);
        if arena.airports.len() == before {
            return Err(RepositoryError::NotFound(format!("airport {}", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl CustomerRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<Customer>> {
        let arena = self.arena.read().await;
        Ok(arena.customers.iter().find(|c| c.username == username).cloned())
    }

    async fn create(&self, customer: &Customer) -> RepoResult<Customer> {
        let mut arena = self.arena.write().await;
        if arena.customers.iter().any(|c| c.username == customer.username) {
            return Err(RepositoryError::UniqueViolation(format!("username {}", customer.username)));
        }
        if arena.customers.iter().any(|c| c.email == customer.email) {
            return Err(RepositoryError::UniqueViolation(format!("email {}", customer.email)));
        }
        arena.customers.push(customer.clone());
        Ok(customer.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, day).unwrap()
    }

    async fn flight(store: &InMemoryStore, from: &str, to: &str, day: u32, price: f64) -> Flight {
        let flight = Flight {
            id: Uuid::new_v4(),
            departure_airport: store.find_or_create(from).await.unwrap(),
            arrival_airport: store.find_or_create(to).await.unwrap(),
            departure_date: date(day),
            departure_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            return_date: None,
            return_time: None,
            price,
            return_flight_id: None,
        };
        FlightRepository::save(store, &flight).await.unwrap()
    }

    #[tokio::test]
    async fn test_find_or_create_is_idempotent() {
        let store = InMemoryStore::new();
        let a = store.find_or_create("ISTANBUL").await.unwrap();
        let b = store.find_or_create("ISTANBUL").await.unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(store.find_all(PageRequest::new(1).unwrap()).await.unwrap().total_elements, 1);
    }

    #[tokio::test]
    async fn test_pagination_over_forty_flights() {
        let store = InMemoryStore::new();
        for i in 0..40 {
            flight(&store, "ISTANBUL", "ANKARA", 1 + (i % 28), 100.0 + i as f64).await;
        }

        let last = store.search(&FlightQuery::All, PageRequest::new(3).unwrap()).await.unwrap();
        assert_eq!(last.content.len(), 10);
        assert_eq!(last.total_pages(), 3);

        let empty = store.search(&FlightQuery::All, PageRequest::new(4).unwrap()).await.unwrap();
        assert!(empty.content.is_empty());
    }

    #[tokio::test]
    async fn test_cheapest_is_sorted_and_stable() {
        let store = InMemoryStore::new();
        let first = flight(&store, "ISTANBUL", "ANKARA", 2, 50.0).await;
        flight(&store, "ISTANBUL", "ANKARA", 3, 10.0).await;
        let third = flight(&store, "ISTANBUL", "ANKARA", 4, 50.0).await;
        flight(&store, "ISTANBUL", "IZMIR", 4, 1.0).await;

        let query = FlightQuery::CheapestByAirportsAndDateRange {
            departure: "ISTANBUL".into(),
            arrival: "ANKARA".into(),
            start: date(1),
            end: date(28),
        };
        let page = store.search(&query, PageRequest::new(1).unwrap()).await.unwrap();
        let prices: Vec<f64> = page.content.iter().map(|f| f.price).collect();
        assert_eq!(prices, vec![10.0, 50.0, 50.0]);
        assert_eq!(page.content[1].id, first.id);
        assert_eq!(page.content[2].id, third.id);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_return_leg() {
        let store = InMemoryStore::new();
        let inbound = flight(&store, "ANKARA", "ISTANBUL", 15, 80.0).await;
        let mut outbound = flight(&store, "ISTANBUL", "ANKARA", 1, 80.0).await;
        outbound.return_flight_id = Some(inbound.id);
        FlightRepository::save(&store, &outbound).await.unwrap();

        FlightRepository::delete(&store, outbound.id).await.unwrap();
        assert!(FlightRepository::find_by_id(&store, inbound.id).await.unwrap().is_none());
        assert!(FlightRepository::find_by_id(&store, outbound.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleting_return_leg_clears_reference() {
        let store = InMemoryStore::new();
        let inbound = flight(&store, "ANKARA", "ISTANBUL", 15, 80.0).await;
        let mut outbound = flight(&store, "ISTANBUL", "ANKARA", 1, 80.0).await;
        outbound.return_flight_id = Some(inbound.id);
        FlightRepository::save(&store, &outbound).await.unwrap();

        FlightRepository::delete(&store, inbound.id).await.unwrap();
        let kept = FlightRepository::find_by_id(&store, outbound.id).await.unwrap().unwrap();
        assert_eq!(kept.return_flight_id, None);
    }

    #[tokio::test]
    async fn test_airport_rename_is_seen_by_flights() {
        let store = InMemoryStore::new();
        let f = flight(&store, "ISTANBUL", "ANKARA", 1, 80.0).await;
        let mut airport = f.arrival_airport.clone();
        airport.city = "ANKARA_ESENBOGA".to_string();
        AirportRepository::save(&store, &airport).await.unwrap();

        let reloaded = FlightRepository::find_by_id(&store, f.id).await.unwrap().unwrap();
        assert_eq!(reloaded.arrival_airport.city, "ANKARA_ESENBOGA");
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let store = InMemoryStore::new();
        let customer = Customer {
            id: Uuid::new_v4(),
            username: "alice".into(),
            first_name: "Alice".into(),
            middle_name: None,
            last_name: "Doe".into(),
            email: "alice@example.com".into(),
            password_hash: "x".into(),
            roles: BTreeSet::new(),
        };
        store.create(&customer).await.unwrap();

        let mut again = customer.clone();
        again.id = Uuid::new_v4();
        again.email = "other@example.com".into();
        assert!(matches!(store.create(&again).await, Err(RepositoryError::UniqueViolation(_))));
    }
}
