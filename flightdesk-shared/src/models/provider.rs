use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::format;

/// A flight as emitted by the synthetic flight provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderFlight {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<Uuid>,
    pub departure_airport: String,
    pub arrival_airport: String,
    #[serde(with = "format::date")]
    pub departure_date: NaiveDate,
    #[serde(with = "format::time")]
    pub departure_time: NaiveTime,
    #[serde(with = "format::option_date", default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<NaiveDate>,
    #[serde(with = "format::option_time", default, skip_serializing_if = "Option::is_none")]
    pub return_time: Option<NaiveTime>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_flight: Option<Box<ProviderFlight>>,
}

/// Outbound and inbound legs generated together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundTrip {
    pub outbound: ProviderFlight,
    pub inbound: ProviderFlight,
}

impl ProviderFlight {
    /// Splits an outbound flight with an embedded return leg into both legs.
    /// A flight without a return leg is handed back unchanged.
    pub fn into_round_trip(mut self) -> Result<RoundTrip, ProviderFlight> {
        match self.return_flight.take() {
            Some(inbound) => Ok(RoundTrip {
                outbound: self,
                inbound: *inbound,
            }),
            None => Err(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_payload_splits_into_round_trip() {
        let json = r#"{
            "departure_airport": "ISTANBUL",
            "arrival_airport": "ANKARA",
            "departure_date": "01/02/2024",
            "departure_time": "10:20:00",
            "return_date": "05/02/2024",
            "return_time": "18:00:00",
            "price": 420.0,
            "return_flight": {
                "departure_airport": "ANKARA",
                "arrival_airport": "ISTANBUL",
                "departure_date": "05/02/2024",
                "departure_time": "18:00:00",
                "price": 420.0
            }
        }"#;
        let flight: ProviderFlight = serde_json::from_str(json).unwrap();
        let trip = flight.into_round_trip().unwrap();
        assert!(trip.outbound.return_flight.is_none());
        assert_eq!(trip.inbound.departure_airport, "ANKARA");
        assert_eq!(trip.inbound.return_date, None);
    }

    #[test]
    fn test_one_way_is_handed_back() {
        let json = r#"{
            "departure_airport": "IZMIR",
            "arrival_airport": "BURSA",
            "departure_date": "01/02/2024",
            "departure_time": "07:00:00",
            "price": 99.0
        }"#;
        let flight: ProviderFlight = serde_json::from_str(json).unwrap();
        assert!(flight.into_round_trip().is_err());
    }
}
