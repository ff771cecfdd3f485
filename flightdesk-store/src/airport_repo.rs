use async_trait::async_trait;
use flightdesk_core::model::Airport;
use flightdesk_core::page::{Page, PageRequest};
use flightdesk_core::repository::{AirportRepository, RepoResult, RepositoryError};
use sqlx::PgPool;
use uuid::Uuid;

use crate::map_sqlx_error;

pub struct PostgresAirportRepository {
    pool: PgPool,
}

impl PostgresAirportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AirportRow {
    id: Uuid,
    city: String,
}

impl From<AirportRow> for Airport {
    fn from(row: AirportRow) -> Self {
        Airport { id: row.id, city: row.city }
    }
}

#[async_trait]
impl AirportRepository for PostgresAirportRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Airport>> {
        let row = sqlx::query_as::<_, AirportRow>("SELECT id, city FROM airport WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(Airport::from))
    }

    async fn find_by_city(&self, city: &str) -> RepoResult<Option<Airport>> {
        let row = sqlx::query_as::<_, AirportRow>("SELECT id, city FROM airport WHERE city = $1")
            .bind(city)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(Airport::from))
    }

    async fn find_or_create(&self, city: &str) -> RepoResult<Airport> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query_as::<_, AirportRow>(
            r#"
            INSERT INTO airport (id, city) VALUES ($1, $2)
            ON CONFLICT (city) DO UPDATE SET city = EXCLUDED.city
            RETURNING id, city
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(city)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn find_all(&self, page: PageRequest) -> RepoResult<Page<Airport>> {
        let total: i64 = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM airport")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let rows = sqlx::query_as::<_, AirportRow>(
            "SELECT id, city FROM airport ORDER BY city LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(Page::new(
            rows.into_iter().map(Airport::from).collect(),
            total.max(0) as u64,
            page,
        ))
    }

    async fn save(&self, airport: &Airport) -> RepoResult<Airport> {
        let row = sqlx::query_as::<_, AirportRow>(
            r#"
            INSERT INTO airport (id, city) VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET city = EXCLUDED.city
            RETURNING id, city
            "#,
        )
        .bind(airport.id)
        .bind(&airport.city)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM airport WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("airport {}", id)));
        }
        Ok(())
    }
}
