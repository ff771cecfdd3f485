use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Local;
use flightdesk_shared::{ErrorMessage, ProviderFlight};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::generator::{FlightGenerator, GeneratorError, Localization};

pub struct ProviderError(GeneratorError);

impl From<GeneratorError> for ProviderError {
    fn from(err: GeneratorError) -> Self {
        ProviderError(err)
    }
}

impl IntoResponse for ProviderError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(ErrorMessage::new(self.0.to_string()))).into_response()
    }
}

#[derive(Debug, Clone, Copy)]
enum TripKind {
    OneWay,
    Round,
}

fn generate(generator: &FlightGenerator, kind: TripKind, localization: Localization) -> Vec<ProviderFlight> {
    let mut rng = rand::thread_rng();
    let today = Local::now().date_naive();
    match kind {
        TripKind::OneWay => generator.one_way_batch(&mut rng, localization, today),
        TripKind::Round => generator.round_trip_batch(&mut rng, localization, today),
    }
}

async fn generate_flights(
    State(generator): State<Arc<FlightGenerator>>,
    Path((kind, localization)): Path<(String, String)>,
) -> Result<Json<Vec<ProviderFlight>>, ProviderError> {
    let kind = match kind.as_str() {
        "one-way" => TripKind::OneWay,
        "round" => TripKind::Round,
        other => {
            return Err(GeneratorError::InvalidSettings(format!("Unknown trip kind: {}", other)).into());
        }
    };
    let localization: Localization = localization.parse()?;

    let flights = generate(&generator, kind, localization);
    info!("Generated {} {:?} flights ({:?})", flights.len(), kind, localization);

    Ok(Json(flights))
}

pub fn app(generator: Arc<FlightGenerator>) -> Router {
    Router::new()
        .route("/api/generator/flight/generate/{kind}/{localization}", get(generate_flights))
        .layer(TraceLayer::new_for_http())
        .with_state(generator)
}
