use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

use crate::domain::invoice::{
  CustomerId, Invoice, InvoiceChanges, InvoiceStatus, NewInvoice, errors::InvoiceError,
  ports::InvoiceRepository,
};

#[derive(Debug, FromRow)]
struct InvoiceRow {
  id: String,
  customer_id: String,
  amount: i64,
  status: String,
  date: NaiveDate,
}

impl TryFrom<InvoiceRow> for Invoice {
  type Error = InvoiceError;

  fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
    let customer_id = CustomerId::new(&row.customer_id)?;
    let status = InvoiceStatus::from_str(&row.status)?;

    Ok(Invoice {
      id: row.id,
      customer_id,
      amount_in_cents: row.amount,
      status,
      date: row.date,
    })
  }
}

/// Invoices table access. Ids travel as text and are cast to UUID in SQL, so
/// a malformed id surfaces as a database error.
pub struct PostgresInvoiceRepository {
  pool: PgPool,
}

impl PostgresInvoiceRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
  async fn create(&self, invoice: NewInvoice) -> Result<Invoice, InvoiceError> {
    let row = sqlx::query_as::<_, InvoiceRow>(
      r#"
            INSERT INTO invoices (customer_id, amount, status, date)
            VALUES (CAST($1 AS UUID), $2, $3, $4)
            RETURNING id::text AS id, customer_id::text AS customer_id, amount, status, date
            "#,
    )
    .bind(invoice.customer_id.value())
    .bind(invoice.amount_in_cents)
    .bind(invoice.status.as_str())
    .bind(invoice.date)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn update(&self, id: &str, changes: InvoiceChanges) -> Result<u64, InvoiceError> {
    let result = sqlx::query(
      r#"
            UPDATE invoices
            SET customer_id = CAST($2 AS UUID), amount = $3, status = $4
            WHERE id = CAST($1 AS UUID)
            "#,
    )
    .bind(id)
    .bind(changes.customer_id.value())
    .bind(changes.amount_in_cents)
    .bind(changes.status.as_str())
    .execute(&self.pool)
    .await?;

    Ok(result.rows_affected())
  }

  async fn delete(&self, id: &str) -> Result<u64, InvoiceError> {
    let result = sqlx::query(
      r#"
      DELETE FROM invoices
      WHERE id = CAST($1 AS UUID)
      "#,
    )
    .bind(id)
    .execute(&self.pool)
    .await?;

    Ok(result.rows_affected())
  }

  async fn list(&self) -> Result<Vec<Invoice>, InvoiceError> {
    let rows = sqlx::query_as::<_, InvoiceRow>(
      r#"
            SELECT id::text AS id, customer_id::text AS customer_id, amount, status, date
            FROM invoices
            ORDER BY date DESC, id
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use sqlx::postgres::PgPoolOptions;
  use testcontainers::ImageExt;
  use testcontainers_modules::postgres::Postgres;
  use testcontainers_modules::testcontainers::{ContainerAsync, runners::AsyncRunner};

  const CUSTOMER_ID: &str = "3958dc9e-712f-4377-85e9-fec4b6a6442a";

  async fn setup_test_db() -> (PgPool, ContainerAsync<Postgres>) {
    let container = Postgres::default()
      .with_tag("16-alpine")
      .start()
      .await
      .expect("Failed to start postgres container");

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
      .get_host_port_ipv4(5432)
      .await
      .expect("Failed to get port");
    let database_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let pool = PgPoolOptions::new()
      .max_connections(5)
      .connect(&database_url)
      .await
      .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
      .run(&pool)
      .await
      .expect("Failed to run migrations");

    sqlx::query("INSERT INTO customers (id, name, email) VALUES (CAST($1 AS UUID), $2, $3)")
      .bind(CUSTOMER_ID)
      .bind("Delba de Oliveira")
      .bind("delba@oliveira.com")
      .execute(&pool)
      .await
      .expect("Failed to seed customer");

    (pool, container)
  }

  fn new_invoice(customer_id: &str, amount_in_cents: i64) -> NewInvoice {
    NewInvoice {
      customer_id: CustomerId::new(customer_id).unwrap(),
      amount_in_cents,
      status: InvoiceStatus::Pending,
      date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
    }
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_create_assigns_id() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresInvoiceRepository::new(pool);

    let invoice = repo.create(new_invoice(CUSTOMER_ID, 25000)).await.unwrap();

    assert!(uuid::Uuid::parse_str(&invoice.id).is_ok());
    assert_eq!(invoice.customer_id.value(), CUSTOMER_ID);
    assert_eq!(invoice.amount_in_cents, 25000);
    assert_eq!(invoice.date.to_string(), "2024-06-01");
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_create_unknown_customer_fails() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresInvoiceRepository::new(pool);

    let missing = repo
      .create(new_invoice("00000000-0000-0000-0000-000000000000", 100))
      .await;
    assert!(matches!(missing, Err(InvoiceError::Database(_))));

    let malformed = repo.create(new_invoice("c1", 100)).await;
    assert!(matches!(malformed, Err(InvoiceError::Database(_))));
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_update_and_delete() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresInvoiceRepository::new(pool);
    let invoice = repo.create(new_invoice(CUSTOMER_ID, 1000)).await.unwrap();

    let updated = repo
      .update(
        &invoice.id,
        InvoiceChanges {
          customer_id: invoice.customer_id.clone(),
          amount_in_cents: 1,
          status: InvoiceStatus::Paid,
        },
      )
      .await
      .unwrap();
    assert_eq!(updated, 1);

    let listed = repo.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].amount_in_cents, 1);
    assert_eq!(listed[0].status, InvoiceStatus::Paid);
    assert_eq!(listed[0].date, invoice.date);

    assert_eq!(repo.delete(&invoice.id).await.unwrap(), 1);
    assert_eq!(repo.delete(&invoice.id).await.unwrap(), 0);
    assert!(repo.list().await.unwrap().is_empty());
  }
}
