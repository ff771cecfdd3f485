use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveTime};
use flightdesk_core::normalize::normalize_city;
use flightdesk_shared::ProviderFlight;
use rand::Rng;

use crate::cities::{TURKISH_CITIES, WORLD_CITIES};
use crate::config::ProviderConfig;

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Unknown localization: {0}")]
    UnknownLocalization(String),

    #[error("Invalid generator settings: {0}")]
    InvalidSettings(String),
}

/// Which city list a batch draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Localization {
    Tr,
    Random,
}

impl Localization {
    fn cities(&self) -> &'static [&'static str] {
        match self {
            Localization::Tr => &TURKISH_CITIES,
            Localization::Random => &WORLD_CITIES,
        }
    }
}

impl FromStr for Localization {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tr" => Ok(Localization::Tr),
            "random" => Ok(Localization::Random),
            other => Err(GeneratorError::UnknownLocalization(other.to_string())),
        }
    }
}

/// Synthesizes one-way and round-trip flights.
#[derive(Debug, Clone)]
pub struct FlightGenerator {
    config: ProviderConfig,
}

impl FlightGenerator {
    pub fn new(config: ProviderConfig) -> Result<Self, GeneratorError> {
        if config.min >= config.max {
            return Err(GeneratorError::InvalidSettings(format!(
                "min ({}) must be below max ({})",
                config.min, config.max
            )));
        }
        if config.min_price.trunc() >= config.max_price.trunc() || config.min_price < 1.0 {
            return Err(GeneratorError::InvalidSettings(format!(
                "price range [{}, {}) is empty or not positive",
                config.min_price, config.max_price
            )));
        }
        if config.date_range == 0 || config.return_date_range < 2 {
            return Err(GeneratorError::InvalidSettings(
                "date_range must be positive and return_date_range at least 2".to_string(),
            ));
        }
        Ok(Self { config })
    }

    pub fn one_way_batch<R: Rng>(&self, rng: &mut R, localization: Localization, today: NaiveDate) -> Vec<ProviderFlight> {
        let count = rng.gen_range(self.config.min..self.config.max);
        (0..count).map(|_| self.one_way(rng, localization, today)).collect()
    }

    /// Outbound flights, each with its inbound leg embedded.
    pub fn round_trip_batch<R: Rng>(&self, rng: &mut R, localization: Localization, today: NaiveDate) -> Vec<ProviderFlight> {
        let count = rng.gen_range(self.config.min..self.config.max);
        (0..count).map(|_| self.round_trip(rng, localization, today)).collect()
    }

    fn one_way<R: Rng>(&self, rng: &mut R, localization: Localization, today: NaiveDate) -> ProviderFlight {
        let (from, to) = self.city_pair(rng, localization);

        ProviderFlight {
            flight_number: None,
            departure_airport: from,
            arrival_airport: to,
            departure_date: self.departure_date(rng, today),
            departure_time: time_of_day(rng),
            return_date: None,
            return_time: None,
            price: self.price(rng),
            return_flight: None,
        }
    }

    fn round_trip<R: Rng>(&self, rng: &mut R, localization: Localization, today: NaiveDate) -> ProviderFlight {
        let (from, to) = self.city_pair(rng, localization);
        let departure_date = self.departure_date(rng, today);
        let return_date = departure_date + Duration::days(rng.gen_range(1..self.config.return_date_range) as i64);
        let return_time = time_of_day(rng);
        let price = self.price(rng);

        let inbound = ProviderFlight {
            flight_number: None,
            departure_airport: to.clone(),
            arrival_airport: from.clone(),
            departure_date: return_date,
            departure_time: return_time,
            return_date: None,
            return_time: None,
            price,
            return_flight: None,
        };

        ProviderFlight {
            flight_number: None,
            departure_airport: from,
            arrival_airport: to,
            departure_date,
            departure_time: time_of_day(rng),
            return_date: Some(return_date),
            return_time: Some(return_time),
            price,
            return_flight: Some(Box::new(inbound)),
        }
    }

    /// Two different cities, already normalized.
    fn city_pair<R: Rng>(&self, rng: &mut R, localization: Localization) -> (String, String) {
        let cities = localization.cities();
        let from = rng.gen_range(0..cities.len());
        // skip over the departure index so the pair always differs
        let mut to = rng.gen_range(0..cities.len() - 1);
        if to >= from {
            to += 1;
        }
        (normalize_city(cities[from]), normalize_city(cities[to]))
    }

    fn departure_date<R: Rng>(&self, rng: &mut R, today: NaiveDate) -> NaiveDate {
        today + Duration::days(rng.gen_range(0..self.config.date_range) as i64)
    }

    fn price<R: Rng>(&self, rng: &mut R) -> f64 {
        let min = self.config.min_price as i64;
        let max = self.config.max_price as i64;
        rng.gen_range(min..max) as f64
    }
}

/// Whole hour plus a multiple of ten minutes.
fn time_of_day<R: Rng>(rng: &mut R) -> NaiveTime {
    let hour = rng.gen_range(0..24);
    let minute = 10 * rng.gen_range(0..5);
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}
