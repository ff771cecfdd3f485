use flightdesk_shared::{AirportInfo, FlightInfo, FlightResponse, ProviderFlight};
use uuid::Uuid;

use crate::model::{Airport, Flight};

pub fn to_flight_info(flight: &Flight) -> FlightInfo {
    FlightInfo {
        flight_number: flight.id,
        from: flight.departure_airport.city.clone(),
        to: flight.arrival_airport.city.clone(),
        departure_date: flight.departure_date,
        departure_time: flight.departure_time,
        return_date: flight.return_date,
        return_time: flight.return_time,
        price: flight.price,
    }
}

pub fn to_flight_response(flight: &Flight, return_leg: Option<&Flight>) -> FlightResponse {
    FlightResponse {
        departure: to_flight_info(flight),
        return_flight: return_leg.map(to_flight_info),
    }
}

pub fn to_airport_info(airport: &Airport) -> AirportInfo {
    AirportInfo {
        id: airport.id,
        city: airport.city.clone(),
    }
}

/// Builds a new flight from a provider record whose airports are already resolved.
/// Provider flight numbers are not trusted as storage ids.
pub fn from_provider(
    dto: &ProviderFlight,
    departure_airport: Airport,
    arrival_airport: Airport,
    return_flight_id: Option<Uuid>,
) -> Flight {
    Flight {
        id: Uuid::new_v4(),
        departure_airport,
        arrival_airport,
        departure_date: dto.departure_date,
        departure_time: dto.departure_time,
        return_date: dto.return_date,
        return_time: dto.return_time,
        price: dto.price,
        return_flight_id,
    }
}
