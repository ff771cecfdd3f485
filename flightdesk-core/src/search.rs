use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use flightdesk_shared::{
    format, FlightResponse, FlightsResponse, PriceRangeSearchRequest, ResponseEnvelope,
    SearchFullQualifiedRequest,
};
use tracing::debug;
use uuid::Uuid;

use crate::mapper::to_flight_response;
use crate::model::Flight;
use crate::normalize::normalize_city;
use crate::page::{Page, PageRequest};
use crate::repository::{FlightQuery, FlightRepository};
use crate::{CoreError, CoreResult};

/// A page of shaped search results inside the standard envelope.
pub type FlightPage = ResponseEnvelope<FlightsResponse>;

/// Parses a `dd/MM/yyyy` query parameter.
pub fn parse_date(value: &str) -> CoreResult<NaiveDate> {
    format::parse_date(value)
        .map_err(|e| CoreError::ParseError(format!("Text '{}' could not be parsed: {}", value, e)))
}

/// Resolves the return legs of a result page in one batch and wraps the
/// shaped flights in the paging envelope.
pub(crate) async fn shape_page(flights: &dyn FlightRepository, page: Page<Flight>) -> CoreResult<FlightPage> {
    let return_ids: Vec<Uuid> = page.content.iter().filter_map(|f| f.return_flight_id).collect();

    let return_legs: HashMap<Uuid, Flight> = if return_ids.is_empty() {
        HashMap::new()
    } else {
        flights
            .find_by_ids(&return_ids)
            .await?
            .into_iter()
            .map(|f| (f.id, f))
            .collect()
    };

    let shaped: Vec<FlightResponse> = page
        .content
        .iter()
        .map(|f| to_flight_response(f, f.return_flight_id.and_then(|id| return_legs.get(&id))))
        .collect();

    Ok(ResponseEnvelope::paged(
        page.request.page,
        page.total_pages(),
        shaped.len() as u32,
        FlightsResponse { flights: shaped },
    ))
}

fn check_date_order(departure: NaiveDate, return_date: Option<NaiveDate>) -> CoreResult<NaiveDate> {
    let return_date =
        return_date.ok_or_else(|| CoreError::ValidationError("Return date cannot be empty".to_string()))?;
    if departure > return_date {
        return Err(CoreError::ValidationError(
            "Departure date cannot be after return date".to_string(),
        ));
    }
    Ok(return_date)
}

pub struct FlightSearchService {
    flights: Arc<dyn FlightRepository>,
}

impl FlightSearchService {
    pub fn new(flights: Arc<dyn FlightRepository>) -> Self {
        Self { flights }
    }

    async fn run(&self, operation: &str, query: FlightQuery, page: u32) -> CoreResult<FlightPage> {
        let request = PageRequest::new(page)?;
        let found = self.flights.search(&query, request).await?;
        debug!(
            "{}: page {} of {}, {} total",
            operation,
            request.page,
            found.total_pages(),
            found.total_elements
        );
        shape_page(self.flights.as_ref(), found).await
    }

    pub async fn find_flight_by_id(&self, id: Uuid) -> CoreResult<ResponseEnvelope<FlightResponse>> {
        let flight = self
            .flights
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFoundError("Flight Not Found!".to_string()))?;

        let return_leg = match flight.return_flight_id {
            Some(return_id) => self.flights.find_by_id(return_id).await?,
            None => None,
        };

        Ok(ResponseEnvelope::success(to_flight_response(&flight, return_leg.as_ref())))
    }

    pub async fn find_by_arrival_airport(&self, arrival: &str, page: u32) -> CoreResult<FlightPage> {
        let query = FlightQuery::ByArrivalAirport {
            arrival: normalize_city(arrival),
        };
        self.run("find_by_arrival_airport", query, page).await
    }

    pub async fn find_by_departure_airport(&self, from: &str, page: u32) -> CoreResult<FlightPage> {
        let query = FlightQuery::ByDepartureAirport {
            departure: normalize_city(from),
        };
        self.run("find_by_departure_airport", query, page).await
    }

    pub async fn find_by_airports(&self, from: &str, to: &str, page: u32) -> CoreResult<FlightPage> {
        let query = FlightQuery::ByAirports {
            departure: normalize_city(from),
            arrival: normalize_city(to),
        };
        self.run("find_by_airports", query, page).await
    }

    /// Both airports, exact departure date and exact return date.
    pub async fn find_full_qualified(&self, request: &SearchFullQualifiedRequest) -> CoreResult<FlightPage> {
        let return_date = check_date_order(request.departure_date, request.return_date)?;
        let query = FlightQuery::ByAirportsAndDates {
            departure: normalize_city(&request.departure_airport),
            arrival: normalize_city(&request.arrival_airport),
            departure_date: request.departure_date,
            return_date,
        };
        self.run("find_full_qualified", query, request.page).await
    }

    pub async fn find_by_airports_and_date(&self, from: &str, to: &str, date: &str, page: u32) -> CoreResult<FlightPage> {
        let query = FlightQuery::ByAirportsAndDate {
            departure: normalize_city(from),
            arrival: normalize_city(to),
            date: parse_date(date)?,
        };
        self.run("find_by_airports_and_date", query, page).await
    }

    pub async fn find_by_airports_and_date_range(
        &self,
        from: &str,
        to: &str,
        start: &str,
        end: &str,
        page: u32,
    ) -> CoreResult<FlightPage> {
        let query = FlightQuery::ByAirportsAndDateRange {
            departure: normalize_city(from),
            arrival: normalize_city(to),
            start: parse_date(start)?,
            end: parse_date(end)?,
        };
        self.run("find_by_airports_and_date_range", query, page).await
    }

    pub async fn find_by_departure_date_range(&self, start: &str, end: &str, page: u32) -> CoreResult<FlightPage> {
        let query = FlightQuery::ByDepartureDateRange {
            start: parse_date(start)?,
            end: parse_date(end)?,
        };
        self.run("find_by_departure_date_range", query, page).await
    }

    pub async fn find_by_departure_airport_and_date_range(
        &self,
        from: &str,
        start: &str,
        end: &str,
        page: u32,
    ) -> CoreResult<FlightPage> {
        let query = FlightQuery::ByDepartureAirportAndDateRange {
            departure: normalize_city(from),
            start: parse_date(start)?,
            end: parse_date(end)?,
        };
        self.run("find_by_departure_airport_and_date_range", query, page).await
    }

    pub async fn find_by_price_range(&self, min: f64, max: f64, page: u32) -> CoreResult<FlightPage> {
        self.run("find_by_price_range", FlightQuery::ByPriceRange { min, max }, page).await
    }

    pub async fn find_by_departure_airport_and_date(&self, from: &str, date: &str, page: u32) -> CoreResult<FlightPage> {
        let query = FlightQuery::ByDepartureAirportAndDate {
            departure: normalize_city(from),
            date: parse_date(date)?,
        };
        self.run("find_by_departure_airport_and_date", query, page).await
    }

    pub async fn find_by_arrival_airport_and_date(&self, arrival: &str, date: &str, page: u32) -> CoreResult<FlightPage> {
        let query = FlightQuery::ByArrivalAirportAndDate {
            arrival: normalize_city(arrival),
            date: parse_date(date)?,
        };
        self.run("find_by_arrival_airport_and_date", query, page).await
    }

    /// Same filter as [`Self::find_by_airports_and_date_range`], cheapest first.
    pub async fn find_cheapest_in_range(
        &self,
        from: &str,
        to: &str,
        start: &str,
        end: &str,
        page: u32,
    ) -> CoreResult<FlightPage> {
        let query = FlightQuery::CheapestByAirportsAndDateRange {
            departure: normalize_city(from),
            arrival: normalize_city(to),
            start: parse_date(start)?,
            end: parse_date(end)?,
        };
        self.run("find_cheapest_in_range", query, page).await
    }

    /// Flights touching the city at either end within the date range.
    pub async fn find_by_city_and_date_range(&self, city: &str, start: &str, end: &str, page: u32) -> CoreResult<FlightPage> {
        let query = FlightQuery::ByCityAndDateRange {
            city: normalize_city(city),
            start: parse_date(start)?,
            end: parse_date(end)?,
        };
        self.run("find_by_city_and_date_range", query, page).await
    }

    pub async fn find_by_airports_date_and_price_range(&self, request: &PriceRangeSearchRequest) -> CoreResult<FlightPage> {
        let end = check_date_order(request.departure_date, request.return_date)?;
        let query = FlightQuery::ByAirportsDateRangeAndPriceRange {
            departure: normalize_city(&request.departure_airport),
            arrival: normalize_city(&request.arrival_airport),
            start: request.departure_date,
            end,
            min: request.min_price,
            max: request.max_price,
        };
        self.run("find_by_airports_date_and_price_range", query, request.page).await
    }

    /// Like [`Self::find_by_airports_date_and_price_range`], but a return date
    /// inside the range also qualifies.
    pub async fn find_by_airports_any_date_and_price_range(
        &self,
        request: &PriceRangeSearchRequest,
    ) -> CoreResult<FlightPage> {
        let end = check_date_order(request.departure_date, request.return_date)?;
        let query = FlightQuery::ByAirportsAnyDateRangeAndPriceRange {
            departure: normalize_city(&request.departure_airport),
            arrival: normalize_city(&request.arrival_airport),
            start: request.departure_date,
            end,
            min: request.min_price,
            max: request.max_price,
        };
        self.run("find_by_airports_any_date_and_price_range", query, request.page).await
    }
}
