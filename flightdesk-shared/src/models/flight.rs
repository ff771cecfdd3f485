use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::format;

/// One flight leg as seen by API clients: airports flattened to city names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightInfo {
    pub flight_number: Uuid,
    pub from: String,
    pub to: String,
    #[serde(with = "format::date")]
    pub departure_date: NaiveDate,
    #[serde(with = "format::time")]
    pub departure_time: NaiveTime,
    #[serde(with = "format::option_date", skip_serializing_if = "Option::is_none", default)]
    pub return_date: Option<NaiveDate>,
    #[serde(with = "format::option_time", skip_serializing_if = "Option::is_none", default)]
    pub return_time: Option<NaiveTime>,
    pub price: f64,
}

/// A departure leg plus, for round trips, its return leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightResponse {
    pub departure: FlightInfo,
    #[serde(rename = "return", skip_serializing_if = "Option::is_none", default)]
    pub return_flight: Option<FlightInfo>,
}

/// Result of creating a flight: a bare leg, or both legs of a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatedFlight {
    RoundTrip(FlightResponse),
    OneWay(FlightInfo),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightsResponse {
    pub flights: Vec<FlightResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportInfo {
    pub id: Uuid,
    pub city: String,
}
