use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::format;

fn default_page() -> u32 {
    1
}

// ============================================================================
// Admin requests
// ============================================================================

/// Required fields are optional here so a missing one reaches the service
/// and fails with a named validation error instead of a decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateFlightRequest {
    #[serde(default)]
    pub departure_airport: Option<String>,
    #[serde(default)]
    pub arrival_airport: Option<String>,
    #[serde(with = "format::option_date", default, skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<NaiveDate>,
    #[serde(with = "format::option_time", default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<NaiveTime>,
    #[serde(with = "format::option_date", default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<NaiveDate>,
    #[serde(with = "format::option_time", default, skip_serializing_if = "Option::is_none")]
    pub return_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_flight: Option<Box<CreateFlightRequest>>,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFlightRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub departure_airport: Option<String>,
    #[serde(default)]
    pub arrival_airport: Option<String>,
    #[serde(with = "format::option_date", default, skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<NaiveDate>,
    #[serde(with = "format::option_time", default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<NaiveTime>,
    #[serde(with = "format::option_date", default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<NaiveDate>,
    #[serde(with = "format::option_time", default, skip_serializing_if = "Option::is_none")]
    pub return_time: Option<NaiveTime>,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAirportRequest {
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAirportRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub city: Option<String>,
}

// ============================================================================
// Search requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchFullQualifiedRequest {
    pub departure_airport: String,
    pub arrival_airport: String,
    #[serde(with = "format::date")]
    pub departure_date: NaiveDate,
    #[serde(with = "format::option_date", default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<NaiveDate>,
    #[serde(default = "default_page")]
    pub page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRangeSearchRequest {
    pub departure_airport: String,
    pub arrival_airport: String,
    #[serde(with = "format::date")]
    pub departure_date: NaiveDate,
    #[serde(with = "format::option_date", default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<NaiveDate>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub min_price: f64,
    #[serde(default)]
    pub max_price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_flight_with_nested_return() {
        let json = r#"
            {
                "arrival_airport": "ISTANBUL",
                "departure_airport": "ANKARA",
                "departure_date": "17/01/2024",
                "departure_time": "12:00:00",
                "return_date": "24/01/2024",
                "return_time": "12:00:00",
                "return_flight": {
                    "arrival_airport": "ANKARA",
                    "departure_airport": "ISTANBUL",
                    "departure_date": "24/01/2024",
                    "departure_time": "12:00:00",
                    "price": 100
                },
                "price": 100
            }
        "#;
        let req: CreateFlightRequest = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(req.departure_airport.as_deref(), Some("ANKARA"));
        assert_eq!(req.return_date, NaiveDate::from_ymd_opt(2024, 1, 24));
        let back = req.return_flight.expect("return leg");
        assert_eq!(back.departure_airport.as_deref(), Some("ISTANBUL"));
        assert!(back.return_flight.is_none());
    }

    #[test]
    fn test_missing_required_fields_still_decode() {
        let req: CreateFlightRequest = serde_json::from_str(r#"{"price": 10}"#).unwrap();
        assert!(req.departure_airport.is_none());
        assert!(req.departure_date.is_none());
    }

    #[test]
    fn test_search_page_defaults_to_one() {
        let json = r#"{"arrival_airport":"A","departure_airport":"B","departure_date":"01/02/2024"}"#;
        let req: SearchFullQualifiedRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.page, 1);
        assert!(req.return_date.is_none());
    }

    #[test]
    fn test_malformed_date_reports_parser_message() {
        let json = r#"{"arrival_airport":"A","departure_airport":"B","departure_date":"2024-02-01"}"#;
        let err = serde_json::from_str::<SearchFullQualifiedRequest>(json).unwrap_err();
        assert!(err.to_string().contains("could not be parsed"));
    }
}
