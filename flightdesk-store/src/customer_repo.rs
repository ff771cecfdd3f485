use std::collections::BTreeSet;

use async_trait::async_trait;
use flightdesk_core::model::{Customer, Role};
use flightdesk_core::repository::{CustomerRepository, RepoResult};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::map_sqlx_error;

pub struct PostgresCustomerRepository {
    pool: PgPool,
}

impl PostgresCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CustomerRow {
    customer_id: Uuid,
    username: String,
    first_name: String,
    middle_name: Option<String>,
    last_name: String,
    email: String,
    password: String,
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT customer_id, username, first_name, middle_name, last_name, email, password
            FROM customer WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let role_names: Vec<String> =
            sqlx::query_scalar::<_, String>("SELECT role FROM authorities WHERE customer_id = $1")
                .bind(row.customer_id)
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        let mut roles = BTreeSet::new();
        for name in role_names {
            match Role::parse(&name) {
                Some(role) => {
                    roles.insert(role);
                }
                None => warn!("Ignoring unknown role {} for {}", name, row.username),
            }
        }

        Ok(Some(Customer {
            id: row.customer_id,
            username: row.username,
            first_name: row.first_name,
            middle_name: row.middle_name,
            last_name: row.last_name,
            email: row.email,
            password_hash: row.password,
            roles,
        }))
    }

    async fn create(&self, customer: &Customer) -> RepoResult<Customer> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            INSERT INTO customer (customer_id, username, first_name, middle_name, last_name, email, password)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(customer.id)
        .bind(&customer.username)
        .bind(&customer.first_name)
        .bind(&customer.middle_name)
        .bind(&customer.last_name)
        .bind(&customer.email)
        .bind(&customer.password_hash)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        for role in &customer.roles {
            sqlx::query("INSERT INTO authorities (customer_id, role) VALUES ($1, $2)")
                .bind(customer.id)
                .bind(role.as_str())
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(customer.clone())
    }
}
