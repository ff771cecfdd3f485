use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    pub id: Uuid,
    /// Always stored normalized, see [`crate::normalize::normalize_city`].
    pub city: String,
}

impl Airport {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            city: city.into(),
        }
    }
}

/// A persisted flight leg.
///
/// A round trip is two rows: the outbound row points at the inbound row via
/// `return_flight_id`, and the inbound row never points anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub id: Uuid,
    pub departure_airport: Airport,
    pub arrival_airport: Airport,
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub return_date: Option<NaiveDate>,
    pub return_time: Option<NaiveTime>,
    pub price: f64,
    pub return_flight_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim_start_matches("ROLE_") {
            "USER" => Some(Role::User),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub roles: BTreeSet<Role>,
}
