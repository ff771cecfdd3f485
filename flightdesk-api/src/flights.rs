use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use flightdesk_core::search::FlightPage;
use flightdesk_shared::{FlightResponse, PriceRangeSearchRequest, ResponseEnvelope, SearchFullQualifiedRequest};
use serde::Deserialize;
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

type SearchResult = Result<Json<FlightPage>, AppError>;
type Params<T> = WithRejection<Query<T>, AppError>;
type JsonBody<T> = WithRejection<Json<T>, AppError>;

fn first_page() -> u32 {
    1
}

// ============================================================================
// Query parameters
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct IdParams {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ArrivalParams {
    pub arrival: String,
    #[serde(default = "first_page")]
    pub p: u32,
}

#[derive(Debug, Deserialize)]
pub struct DepartureParams {
    pub from: String,
    #[serde(default = "first_page")]
    pub p: u32,
}

#[derive(Debug, Deserialize)]
pub struct AirportsParams {
    pub from: String,
    pub to: String,
    #[serde(default = "first_page")]
    pub p: u32,
}

#[derive(Debug, Deserialize)]
pub struct AirportsDateParams {
    pub from: String,
    pub to: String,
    pub date: String,
    #[serde(default = "first_page")]
    pub p: u32,
}

#[derive(Debug, Deserialize)]
pub struct AirportsDateRangeParams {
    pub from: String,
    pub to: String,
    pub start: String,
    pub end: String,
    #[serde(default = "first_page")]
    pub p: u32,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub start: String,
    pub end: String,
    #[serde(default = "first_page")]
    pub p: u32,
}

#[derive(Debug, Deserialize)]
pub struct DepartureDateParams {
    pub from: String,
    pub date: String,
    #[serde(default = "first_page")]
    pub p: u32,
}

#[derive(Debug, Deserialize)]
pub struct ArrivalDateParams {
    pub arrival: String,
    pub date: String,
    #[serde(default = "first_page")]
    pub p: u32,
}

#[derive(Debug, Deserialize)]
pub struct DepartureDateRangeParams {
    pub from: String,
    pub start: String,
    pub end: String,
    #[serde(default = "first_page")]
    pub p: u32,
}

#[derive(Debug, Deserialize)]
pub struct CityDateRangeParams {
    pub city: String,
    pub start: String,
    pub end: String,
    #[serde(default = "first_page")]
    pub p: u32,
}

#[derive(Debug, Deserialize)]
pub struct PriceRangeParams {
    pub min: f64,
    pub max: f64,
    #[serde(default = "first_page")]
    pub p: u32,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/flight/search/full-qualified", post(full_qualified))
        .route("/api/flight/search/by-airports", get(by_airports))
        .route("/api/flight/search/airport-date-price-range", post(airport_date_price_range))
        .route("/api/flight/flights/airport-date-price-range", post(airport_any_date_price_range))
        .route("/api/flight/search/id", get(by_id))
        .route("/api/flight/search/arrival-airport", get(by_arrival_airport))
        .route("/api/flight/search/departure-airport", get(by_departure_airport))
        .route("/api/flight/search/by-origin-destination-date", get(by_airports_and_date))
        .route("/api/flight/search/by-departure-date-range", get(by_departure_date_range))
        .route("/api/flight/search/departure-airport-date-range", get(by_departure_airport_and_date_range))
        .route("/api/flight/search/price-range", get(by_price_range))
        .route("/api/flight/search/departure-airport-specific-date", get(by_departure_airport_and_date))
        .route("/api/flight/search/arrival-airport-specific-date", get(by_arrival_airport_and_date))
        .route("/api/flight/search/from-to-specific-date", get(by_airports_and_date))
        .route("/api/flight/search/from-to-date-range", get(by_airports_and_date_range))
        .route("/api/flight/search/cheapest-from-to-date-range", get(cheapest_in_range))
        .route("/api/flight/search/city-date-range", get(by_city_and_date_range))
}

// ============================================================================
// Handlers
// ============================================================================

async fn full_qualified(
    State(state): State<AppState>,
    WithRejection(Json(request), _): JsonBody<SearchFullQualifiedRequest>,
) -> SearchResult {
    Ok(Json(state.search.find_full_qualified(&request).await?))
}

async fn airport_date_price_range(
    State(state): State<AppState>,
    WithRejection(Json(request), _): JsonBody<PriceRangeSearchRequest>,
) -> SearchResult {
    Ok(Json(state.search.find_by_airports_date_and_price_range(&request).await?))
}

async fn airport_any_date_price_range(
    State(state): State<AppState>,
    WithRejection(Json(request), _): JsonBody<PriceRangeSearchRequest>,
) -> SearchResult {
    Ok(Json(state.search.find_by_airports_any_date_and_price_range(&request).await?))
}

async fn by_id(
    State(state): State<AppState>,
    WithRejection(Query(params), _): Params<IdParams>,
) -> Result<Json<ResponseEnvelope<FlightResponse>>, AppError> {
    Ok(Json(state.search.find_flight_by_id(params.id).await?))
}

async fn by_airports(State(state): State<AppState>, WithRejection(Query(q), _): Params<AirportsParams>) -> SearchResult {
    Ok(Json(state.search.find_by_airports(&q.from, &q.to, q.p).await?))
}

async fn by_arrival_airport(State(state): State<AppState>, WithRejection(Query(q), _): Params<ArrivalParams>) -> SearchResult {
    Ok(Json(state.search.find_by_arrival_airport(&q.arrival, q.p).await?))
}

async fn by_departure_airport(
    State(state): State<AppState>,
    WithRejection(Query(q), _): Params<DepartureParams>,
) -> SearchResult {
    Ok(Json(state.search.find_by_departure_airport(&q.from, q.p).await?))
}

async fn by_airports_and_date(
    State(state): State<AppState>,
    WithRejection(Query(q), _): Params<AirportsDateParams>,
) -> SearchResult {
    Ok(Json(state.search.find_by_airports_and_date(&q.from, &q.to, &q.date, q.p).await?))
}

async fn by_departure_date_range(
    State(state): State<AppState>,
    WithRejection(Query(q), _): Params<DateRangeParams>,
) -> SearchResult {
    Ok(Json(state.search.find_by_departure_date_range(&q.start, &q.end, q.p).await?))
}

async fn by_departure_airport_and_date_range(
    State(state): State<AppState>,
    WithRejection(Query(q), _): Params<DepartureDateRangeParams>,
) -> SearchResult {
    Ok(Json(
        state
            .search
            .find_by_departure_airport_and_date_range(&q.from, &q.start, &q.end, q.p)
            .await?,
    ))
}

async fn by_price_range(State(state): State<AppState>, WithRejection(Query(q), _): Params<PriceRangeParams>) -> SearchResult {
    Ok(Json(state.search.find_by_price_range(q.min, q.max, q.p).await?))
}

async fn by_departure_airport_and_date(
    State(state): State<AppState>,
    WithRejection(Query(q), _): Params<DepartureDateParams>,
) -> SearchResult {
    Ok(Json(state.search.find_by_departure_airport_and_date(&q.from, &q.date, q.p).await?))
}

async fn by_arrival_airport_and_date(
    State(state): State<AppState>,
    WithRejection(Query(q), _): Params<ArrivalDateParams>,
) -> SearchResult {
    Ok(Json(state.search.find_by_arrival_airport_and_date(&q.arrival, &q.date, q.p).await?))
}

async fn by_airports_and_date_range(
    State(state): State<AppState>,
    WithRejection(Query(q), _): Params<AirportsDateRangeParams>,
) -> SearchResult {
    Ok(Json(
        state
            .search
            .find_by_airports_and_date_range(&q.from, &q.to, &q.start, &q.end, q.p)
            .await?,
    ))
}

async fn cheapest_in_range(
    State(state): State<AppState>,
    WithRejection(Query(q), _): Params<AirportsDateRangeParams>,
) -> SearchResult {
    Ok(Json(
        state
            .search
            .find_cheapest_in_range(&q.from, &q.to, &q.start, &q.end, q.p)
            .await?,
    ))
}

async fn by_city_and_date_range(
    State(state): State<AppState>,
    WithRejection(Query(q), _): Params<CityDateRangeParams>,
) -> SearchResult {
    Ok(Json(
        state
            .search
            .find_by_city_and_date_range(&q.city, &q.start, &q.end, q.p)
            .await?,
    ))
}
