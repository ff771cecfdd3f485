use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use flightdesk_provider::{app, FlightGenerator, ProviderConfig};
use flightdesk_shared::ProviderFlight;
use tower::ServiceExt;

fn router() -> axum::Router {
    let config = ProviderConfig {
        port: 0,
        min: 2,
        max: 4,
        min_price: 100.0,
        max_price: 200.0,
        date_range: 10,
        return_date_range: 5,
    };
    app(Arc::new(FlightGenerator::new(config).unwrap()))
}

async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_one_way_tr_batch() {
    let (status, body) = get("/api/generator/flight/generate/one-way/tr").await;
    assert_eq!(status, StatusCode::OK);

    let flights: Vec<ProviderFlight> = serde_json::from_slice(&body).unwrap();
    assert!((2..4).contains(&flights.len()));
    assert!(flights.iter().all(|f| f.return_flight.is_none()));
}

#[tokio::test]
async fn test_round_random_batch_embeds_inbound() {
    let (status, body) = get("/api/generator/flight/generate/round/random").await;
    assert_eq!(status, StatusCode::OK);

    let flights: Vec<ProviderFlight> = serde_json::from_slice(&body).unwrap();
    for outbound in flights {
        let trip = outbound.into_round_trip().expect("round trip");
        assert_eq!(trip.inbound.departure_airport, trip.outbound.arrival_airport);
    }
}

#[tokio::test]
async fn test_unknown_localization_is_bad_request() {
    let (status, body) = get("/api/generator/flight/generate/one-way/mars").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], false);
}
