use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::model::{Airport, Customer, Flight};
use crate::page::{Page, PageRequest};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Duplicate value violates unique constraint: {0}")]
    UniqueViolation(String),
    #[error("Record not found: {0}")]
    NotFound(String),
}

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Every filter combination the search surface supports.
///
/// City fields are expected to be normalized already; storage compares them
/// for equality only.
#[derive(Debug, Clone, PartialEq)]
pub enum FlightQuery {
    All,
    ByArrivalAirport {
        arrival: String,
    },
    ByDepartureAirport {
        departure: String,
    },
    ByAirports {
        departure: String,
        arrival: String,
    },
    ByAirportsAndDate {
        departure: String,
        arrival: String,
        date: NaiveDate,
    },
    ByAirportsAndDates {
        departure: String,
        arrival: String,
        departure_date: NaiveDate,
        return_date: NaiveDate,
    },
    ByAirportsAndDateRange {
        departure: String,
        arrival: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    ByDepartureDateRange {
        start: NaiveDate,
        end: NaiveDate,
    },
    ByDepartureAirportAndDate {
        departure: String,
        date: NaiveDate,
    },
    ByArrivalAirportAndDate {
        arrival: String,
        date: NaiveDate,
    },
    ByDepartureAirportAndDateRange {
        departure: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// Either endpoint is the city.
    ByCityAndDateRange {
        city: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    ByPriceRange {
        min: f64,
        max: f64,
    },
    ByAirportsDateRangeAndPriceRange {
        departure: String,
        arrival: String,
        start: NaiveDate,
        end: NaiveDate,
        min: f64,
        max: f64,
    },
    /// Airports and price must match; either the departure date or the
    /// return date may fall in the range.
    ByAirportsAnyDateRangeAndPriceRange {
        departure: String,
        arrival: String,
        start: NaiveDate,
        end: NaiveDate,
        min: f64,
        max: f64,
    },
    /// Same filter as `ByAirportsAndDateRange`, ordered by ascending price.
    CheapestByAirportsAndDateRange {
        departure: String,
        arrival: String,
        start: NaiveDate,
        end: NaiveDate,
    },
}

fn within(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    start <= date && date <= end
}

fn priced(price: f64, min: f64, max: f64) -> bool {
    min <= price && price <= max
}

impl FlightQuery {
    /// Evaluates the filter against a single flight. All ranges are inclusive.
    pub fn matches(&self, flight: &Flight) -> bool {
        let from = flight.departure_airport.city.as_str();
        let to = flight.arrival_airport.city.as_str();
        let date = flight.departure_date;

        match self {
            FlightQuery::All => true,
            FlightQuery::ByArrivalAirport { arrival } => to == arrival,
            FlightQuery::ByDepartureAirport { departure } => from == departure,
            FlightQuery::ByAirports { departure, arrival } => from == departure && to == arrival,
            FlightQuery::ByAirportsAndDate { departure, arrival, date: d } => {
                from == departure && to == arrival && date == *d
            }
            FlightQuery::ByAirportsAndDates { departure, arrival, departure_date, return_date } => {
                from == departure
                    && to == arrival
                    && date == *departure_date
                    && flight.return_date == Some(*return_date)
            }
            FlightQuery::ByAirportsAndDateRange { departure, arrival, start, end }
            | FlightQuery::CheapestByAirportsAndDateRange { departure, arrival, start, end } => {
                from == departure && to == arrival && within(date, *start, *end)
            }
            FlightQuery::ByDepartureDateRange { start, end } => within(date, *start, *end),
            FlightQuery::ByDepartureAirportAndDate { departure, date: d } => from == departure && date == *d,
            FlightQuery::ByArrivalAirportAndDate { arrival, date: d } => to == arrival && date == *d,
            FlightQuery::ByDepartureAirportAndDateRange { departure, start, end } => {
                from == departure && within(date, *start, *end)
            }
            FlightQuery::ByCityAndDateRange { city, start, end } => {
                (from == city || to == city) && within(date, *start, *end)
            }
            FlightQuery::ByPriceRange { min, max } => priced(flight.price, *min, *max),
            FlightQuery::ByAirportsDateRangeAndPriceRange { departure, arrival, start, end, min, max } => {
                from == departure
                    && to == arrival
                    && within(date, *start, *end)
                    && priced(flight.price, *min, *max)
            }
            FlightQuery::ByAirportsAnyDateRangeAndPriceRange { departure, arrival, start, end, min, max } => {
                let returns_within = flight.return_date.is_some_and(|r| within(r, *start, *end));
                from == departure
                    && to == arrival
                    && (within(date, *start, *end) || returns_within)
                    && priced(flight.price, *min, *max)
            }
        }
    }

    pub fn orders_by_price(&self) -> bool {
        matches!(self, FlightQuery::CheapestByAirportsAndDateRange { .. })
    }
}

/// Repository trait for flight data access
#[async_trait]
pub trait FlightRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Flight>>;

    /// Batch lookup used to resolve return legs for a result page.
    async fn find_by_ids(&self, ids: &[Uuid]) -> RepoResult<Vec<Flight>>;

    async fn search(&self, query: &FlightQuery, page: PageRequest) -> RepoResult<Page<Flight>>;

    /// Inserts the flight, or replaces every field of the row with the same id.
    async fn save(&self, flight: &Flight) -> RepoResult<Flight>;

    /// Persists both legs in one unit of work; the outbound must reference the inbound.
    async fn save_round_trip(&self, outbound: &Flight, inbound: &Flight) -> RepoResult<(Flight, Flight)>;

    /// Removes the flight together with its return leg. Any outbound flight
    /// that referenced it as a return leg loses that reference first.
    async fn delete(&self, id: Uuid) -> RepoResult<()>;

    /// Number of flights departing from or arriving at the airport.
    async fn count_by_airport(&self, airport_id: Uuid) -> RepoResult<u64>;
}

/// Repository trait for airport data access
#[async_trait]
pub trait AirportRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Airport>>;

    async fn find_by_city(&self, city: &str) -> RepoResult<Option<Airport>>;

    /// Returns the airport for an already normalized city, creating it if needed.
    /// Concurrent callers with the same city observe the same row.
    async fn find_or_create(&self, city: &str) -> RepoResult<Airport>;

    async fn find_all(&self, page: PageRequest) -> RepoResult<Page<Airport>>;

    async fn save(&self, airport: &Airport) -> RepoResult<Airport>;

    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

/// Repository trait for customer accounts
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<Customer>>;

    /// Fails with `UniqueViolation` when the username or email is taken.
    async fn create(&self, customer: &Customer) -> RepoResult<Customer>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn flight(from: &str, to: &str, day: u32, price: f64) -> Flight {
        Flight {
            id: Uuid::new_v4(),
            departure_airport: Airport::new(from),
            arrival_airport: Airport::new(to),
            departure_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            departure_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            return_date: None,
            return_time: None,
            price,
            return_flight_id: None,
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let q = FlightQuery::ByAirportsAndDateRange {
            departure: "ISTANBUL".into(),
            arrival: "ANKARA".into(),
            start: d(5),
            end: d(10),
        };
        assert!(q.matches(&flight("ISTANBUL", "ANKARA", 5, 100.0)));
        assert!(q.matches(&flight("ISTANBUL", "ANKARA", 10, 100.0)));
        assert!(!q.matches(&flight("ISTANBUL", "ANKARA", 11, 100.0)));
        assert!(!q.matches(&flight("ANKARA", "ISTANBUL", 6, 100.0)));
    }

    #[test]
    fn test_price_range_includes_both_bounds() {
        let q = FlightQuery::ByPriceRange { min: 100.0, max: 200.0 };
        assert!(q.matches(&flight("A", "B", 1, 100.0)));
        assert!(q.matches(&flight("A", "B", 1, 200.0)));
        assert!(!q.matches(&flight("A", "B", 1, 99.99)));
        assert!(!q.matches(&flight("A", "B", 1, 200.5)));
    }

    #[test]
    fn test_city_matches_either_endpoint() {
        let q = FlightQuery::ByCityAndDateRange { city: "IZMIR".into(), start: d(1), end: d(31) };
        assert!(q.matches(&flight("IZMIR", "ANKARA", 3, 10.0)));
        assert!(q.matches(&flight("ANKARA", "IZMIR", 3, 10.0)));
        assert!(!q.matches(&flight("ANKARA", "BURSA", 3, 10.0)));
    }

    #[test]
    fn test_return_date_may_satisfy_range() {
        let q = FlightQuery::ByAirportsAnyDateRangeAndPriceRange {
            departure: "ISTANBUL".into(),
            arrival: "ANKARA".into(),
            start: d(10),
            end: d(12),
            min: 50.0,
            max: 60.0,
        };
        let mut outbound = flight("ISTANBUL", "ANKARA", 1, 55.0);
        assert!(!q.matches(&outbound));

        outbound.return_date = Some(d(11));
        assert!(q.matches(&outbound));

        outbound.price = 61.0;
        assert!(!q.matches(&outbound));

        assert!(q.matches(&flight("ISTANBUL", "ANKARA", 12, 50.0)));
        assert!(!q.matches(&flight("BURSA", "ANKARA", 12, 50.0)));
    }

    #[test]
    fn test_only_cheapest_orders_by_price() {
        let cheapest = FlightQuery::CheapestByAirportsAndDateRange {
            departure: "A".into(),
            arrival: "B".into(),
            start: d(1),
            end: d(2),
        };
        assert!(cheapest.orders_by_price());
        assert!(!FlightQuery::All.orders_by_price());
    }
}
