use axum::{
    extract::{Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use flightdesk_core::search::FlightPage;
use flightdesk_shared::{
    AirportInfo, CreateAirportRequest, CreateFlightRequest, CreatedFlight, FlightInfo, ResponseEnvelope,
    UpdateAirportRequest, UpdateFlightRequest,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

type Envelope<T> = Result<Json<ResponseEnvelope<T>>, AppError>;

fn first_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct FlightIdParams {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CityParams {
    pub city: String,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default = "first_page")]
    pub p: u32,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/create/flight", post(create_flight))
        .route("/api/admin/create/airport", post(create_airport))
        .route("/api/admin/update/flight", put(update_flight))
        .route("/api/admin/update/airport", put(update_airport))
        .route("/api/admin/delete/flight", delete(delete_flight))
        .route("/api/admin/delete/airport", delete(delete_airport))
        .route("/api/admin/find/flight/all", get(list_flights))
        .route("/api/admin/find/airport/all", get(list_airports))
}

// ============================================================================
// Flights
// ============================================================================

async fn create_flight(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateFlightRequest>, AppError>,
) -> Envelope<CreatedFlight> {
    Ok(Json(state.admin.create_flight(&request).await?))
}

async fn update_flight(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateFlightRequest>, AppError>,
) -> Envelope<FlightInfo> {
    Ok(Json(state.admin.update_flight(&request).await?))
}

async fn delete_flight(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<FlightIdParams>, AppError>,
) -> Envelope<String> {
    info!("Admin requested removal of flight {}", params.id);
    Ok(Json(state.admin.delete_flight(params.id).await?))
}

async fn list_flights(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<PageParams>, AppError>,
) -> Result<Json<FlightPage>, AppError> {
    Ok(Json(state.admin.list_flights(params.p).await?))
}

// ============================================================================
// Airports
// ============================================================================

async fn create_airport(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateAirportRequest>, AppError>,
) -> Envelope<AirportInfo> {
    Ok(Json(state.admin.create_airport(&request).await?))
}

async fn update_airport(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateAirportRequest>, AppError>,
) -> Envelope<AirportInfo> {
    Ok(Json(state.admin.update_airport(&request).await?))
}

async fn delete_airport(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<CityParams>, AppError>,
) -> Envelope<String> {
    Ok(Json(state.admin.delete_airport(&params.city).await?))
}

async fn list_airports(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<PageParams>, AppError>,
) -> Envelope<Vec<AirportInfo>> {
    Ok(Json(state.admin.list_airports(params.p).await?))
}
