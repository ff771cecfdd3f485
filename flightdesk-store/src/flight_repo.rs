use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use flightdesk_core::model::{Airport, Flight};
use flightdesk_core::page::{Page, PageRequest};
use flightdesk_core::repository::{FlightQuery, FlightRepository, RepoResult, RepositoryError};
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::map_sqlx_error;

const SELECT_FLIGHT: &str = r#"
    SELECT
        f.id, f.departure_date, f.departure_time, f.return_date, f.return_time,
        f.price, f.return_flight_id,
        da.id AS departure_airport_id, da.city AS departure_city,
        aa.id AS arrival_airport_id, aa.city AS arrival_city
    FROM flight f
    JOIN airport da ON da.id = f.departure_airport_id
    JOIN airport aa ON aa.id = f.arrival_airport_id
"#;

const COUNT_FLIGHT: &str = r#"
    SELECT COUNT(*)
    FROM flight f
    JOIN airport da ON da.id = f.departure_airport_id
    JOIN airport aa ON aa.id = f.arrival_airport_id
"#;

pub struct PostgresFlightRepository {
    pool: PgPool,
}

impl PostgresFlightRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FlightRow {
    id: Uuid,
    departure_date: NaiveDate,
    departure_time: NaiveTime,
    return_date: Option<NaiveDate>,
    return_time: Option<NaiveTime>,
    price: f64,
    return_flight_id: Option<Uuid>,
    departure_airport_id: Uuid,
    departure_city: String,
    arrival_airport_id: Uuid,
    arrival_city: String,
}

impl From<FlightRow> for Flight {
    fn from(row: FlightRow) -> Self {
        Flight {
            id: row.id,
            departure_airport: Airport {
                id: row.departure_airport_id,
                city: row.departure_city,
            },
            arrival_airport: Airport {
                id: row.arrival_airport_id,
                city: row.arrival_city,
            },
            departure_date: row.departure_date,
            departure_time: row.departure_time,
            return_date: row.return_date,
            return_time: row.return_time,
            price: row.price,
            return_flight_id: row.return_flight_id,
        }
    }
}

/// Appends `WHERE`/`AND` conditions to a query builder.
struct Conditions<'q, 'args> {
    builder: &'q mut QueryBuilder<'args, Postgres>,
    empty: bool,
}

impl<'q, 'args> Conditions<'q, 'args> {
    fn new(builder: &'q mut QueryBuilder<'args, Postgres>) -> Self {
        Self { builder, empty: true }
    }

    fn next(&mut self) -> &mut QueryBuilder<'args, Postgres> {
        self.builder.push(if self.empty { " WHERE " } else { " AND " });
        self.empty = false;
        &mut *self.builder
    }

    fn city(&mut self, column: &str, city: &str) {
        self.next().push(column).push(" = ").push_bind(city.to_string());
    }

    fn date(&mut self, date: NaiveDate) {
        self.next().push("f.departure_date = ").push_bind(date);
    }

    fn date_between(&mut self, start: NaiveDate, end: NaiveDate) {
        self.next()
            .push("f.departure_date BETWEEN ")
            .push_bind(start)
            .push(" AND ")
            .push_bind(end);
    }

    fn price_between(&mut self, min: f64, max: f64) {
        self.next().push("f.price BETWEEN ").push_bind(min).push(" AND ").push_bind(max);
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, query: &FlightQuery) {
    let mut w = Conditions::new(builder);

    match query {
        FlightQuery::All => {}
        FlightQuery::ByArrivalAirport { arrival } => w.city("aa.city", arrival),
        FlightQuery::ByDepartureAirport { departure } => w.city("da.city", departure),
        FlightQuery::ByAirports { departure, arrival } => {
            w.city("da.city", departure);
            w.city("aa.city", arrival);
        }
        FlightQuery::ByAirportsAndDate { departure, arrival, date } => {
            w.city("da.city", departure);
            w.city("aa.city", arrival);
            w.date(*date);
        }
        FlightQuery::ByAirportsAndDates { departure, arrival, departure_date, return_date } => {
            w.city("da.city", departure);
            w.city("aa.city", arrival);
            w.date(*departure_date);
            w.next().push("f.return_date = ").push_bind(*return_date);
        }
        FlightQuery::ByAirportsAndDateRange { departure, arrival, start, end }
        | FlightQuery::CheapestByAirportsAndDateRange { departure, arrival, start, end } => {
            w.city("da.city", departure);
            w.city("aa.city", arrival);
            w.date_between(*start, *end);
        }
        FlightQuery::ByDepartureDateRange { start, end } => w.date_between(*start, *end),
        FlightQuery::ByDepartureAirportAndDate { departure, date } => {
            w.city("da.city", departure);
            w.date(*date);
        }
        FlightQuery::ByArrivalAirportAndDate { arrival, date } => {
            w.city("aa.city", arrival);
            w.date(*date);
        }
        FlightQuery::ByDepartureAirportAndDateRange { departure, start, end } => {
            w.city("da.city", departure);
            w.date_between(*start, *end);
        }
        FlightQuery::ByCityAndDateRange { city, start, end } => {
            w.next()
                .push("(da.city = ")
                .push_bind(city.clone())
                .push(" OR aa.city = ")
                .push_bind(city.clone())
                .push(")");
            w.date_between(*start, *end);
        }
        FlightQuery::ByPriceRange { min, max } => w.price_between(*min, *max),
        FlightQuery::ByAirportsDateRangeAndPriceRange { departure, arrival, start, end, min, max } => {
            w.city("da.city", departure);
            w.city("aa.city", arrival);
            w.date_between(*start, *end);
            w.price_between(*min, *max);
        }
        FlightQuery::ByAirportsAnyDateRangeAndPriceRange { departure, arrival, start, end, min, max } => {
            w.city("da.city", departure);
            w.city("aa.city", arrival);
            w.next()
                .push("(f.departure_date BETWEEN ")
                .push_bind(*start)
                .push(" AND ")
                .push_bind(*end)
                .push(" OR f.return_date BETWEEN ")
                .push_bind(*start)
                .push(" AND ")
                .push_bind(*end)
                .push(")");
            w.price_between(*min, *max);
        }
    }
}

async fn upsert<'e, E: PgExecutor<'e>>(executor: E, flight: &Flight) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO flight (id, departure_airport_id, arrival_airport_id, departure_date, departure_time,
                            return_date, return_time, price, return_flight_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (id) DO UPDATE SET
            departure_airport_id = EXCLUDED.departure_airport_id,
            arrival_airport_id = EXCLUDED.arrival_airport_id,
            departure_date = EXCLUDED.departure_date,
            departure_time = EXCLUDED.departure_time,
            return_date = EXCLUDED.return_date,
            return_time = EXCLUDED.return_time,
            price = EXCLUDED.price,
            return_flight_id = EXCLUDED.return_flight_id
        "#,
    )
    .bind(flight.id)
    .bind(flight.departure_airport.id)
    .bind(flight.arrival_airport.id)
    .bind(flight.departure_date)
    .bind(flight.departure_time)
    .bind(flight.return_date)
    .bind(flight.return_time)
    .bind(flight.price)
    .bind(flight.return_flight_id)
    .execute(executor)
    .await?;

    Ok(())
}

#[async_trait]
impl FlightRepository for PostgresFlightRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Flight>> {
        let row = sqlx::query_as::<_, FlightRow>(&format!("{} WHERE f.id = $1", SELECT_FLIGHT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(Flight::from))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> RepoResult<Vec<Flight>> {
        let rows = sqlx::query_as::<_, FlightRow>(&format!("{} WHERE f.id = ANY($1)", SELECT_FLIGHT))
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Flight::from).collect())
    }

    async fn search(&self, query: &FlightQuery, page: PageRequest) -> RepoResult<Page<Flight>> {
        let mut count = QueryBuilder::<Postgres>::new(COUNT_FLIGHT);
        push_filter(&mut count, query);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let mut select = QueryBuilder::<Postgres>::new(SELECT_FLIGHT);
        push_filter(&mut select, query);
        if query.orders_by_price() {
            select.push(" ORDER BY f.price, f.departure_date, f.departure_time, f.id");
        } else {
            select.push(" ORDER BY f.departure_date, f.departure_time, f.id");
        }
        select
            .push(" LIMIT ")
            .push_bind(page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);

        let rows: Vec<FlightRow> = select
            .build_query_as::<FlightRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        debug!("Flight query {:?} matched {} rows", query, total);
        Ok(Page::new(
            rows.into_iter().map(Flight::from).collect(),
            total.max(0) as u64,
            page,
        ))
    }

    async fn save(&self, flight: &Flight) -> RepoResult<Flight> {
        upsert(&self.pool, flight).await.map_err(map_sqlx_error)?;
        Ok(flight.clone())
    }

    async fn save_round_trip(&self, outbound: &Flight, inbound: &Flight) -> RepoResult<(Flight, Flight)> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        upsert(&mut *tx, inbound).await.map_err(map_sqlx_error)?;
        upsert(&mut *tx, outbound).await.map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok((outbound.clone(), inbound.clone()))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let return_flight_id: Option<Uuid> =
            sqlx::query_scalar::<_, Option<Uuid>>("SELECT return_flight_id FROM flight WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_sqlx_error)?
                .ok_or_else(|| RepositoryError::NotFound(format!("flight {}", id)))?;

        sqlx::query("UPDATE flight SET return_flight_id = NULL WHERE return_flight_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM flight WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        if let Some(return_id) = return_flight_id {
            sqlx::query("DELETE FROM flight WHERE id = $1")
                .bind(return_id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn count_by_airport(&self, airport_id: Uuid) -> RepoResult<u64> {
        let count: i64 = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM flight WHERE departure_airport_id = $1 OR arrival_airport_id = $1",
        )
        .bind(airport_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql(query: &FlightQuery) -> String {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 FROM flight f");
        push_filter(&mut builder, query);
        builder.sql().to_string()
    }

    #[test]
    fn test_unfiltered_query_has_no_where() {
        assert_eq!(sql(&FlightQuery::All), "SELECT 1 FROM flight f");
    }

    #[test]
    fn test_conditions_are_joined_with_and() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let text = sql(&FlightQuery::ByAirportsAndDate {
            departure: "ISTANBUL".into(),
            arrival: "ANKARA".into(),
            date: d,
        });
        assert_eq!(
            text,
            "SELECT 1 FROM flight f WHERE da.city = $1 AND aa.city = $2 AND f.departure_date = $3"
        );
    }

    #[test]
    fn test_any_date_range_groups_the_or() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let text = sql(&FlightQuery::ByAirportsAnyDateRangeAndPriceRange {
            departure: "ISTANBUL".into(),
            arrival: "ANKARA".into(),
            start: d,
            end: d,
            min: 1.0,
            max: 2.0,
        });
        assert!(text.contains("AND (f.departure_date BETWEEN $3 AND $4 OR f.return_date BETWEEN $5 AND $6)"));
        assert!(text.ends_with("AND f.price BETWEEN $7 AND $8"));
    }
}
