//! Postgres-backed invoice repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::invoice::model::{Invoice, InvoiceData, InvoiceItem};
use crate::storage::{InvoiceRepository, RepositoryError};

const INVOICE_COLUMNS: &str = "id, receipt_no, received_from, patient_name, optometrist, items, \
     total_amount, amount_in_words, location, date, receiver, created_at";

#[derive(sqlx::FromRow)]
struct InvoiceRow {
    id: i32,
    receipt_no: String,
    received_from: String,
    patient_name: String,
    optometrist: String,
    items: Json<Vec<InvoiceItem>>,
    total_amount: i64,
    amount_in_words: String,
    location: String,
    date: String,
    receiver: String,
    created_at: Option<DateTime<Utc>>,
}

impl From<InvoiceRow> for Invoice {
    fn from(row: InvoiceRow) -> Self {
        Invoice {
            id: row.id,
            receipt_no: row.receipt_no,
            received_from: row.received_from,
            patient_name: row.patient_name,
            optometrist: row.optometrist,
            items: row.items.0,
            total_amount: row.total_amount,
            amount_in_words: row.amount_in_words,
            location: row.location,
            date: row.date,
            receiver: row.receiver,
            created_at: row.created_at,
        }
    }
}

/// Newest first. Rows without `created_at` sort after dated ones, like the
/// in-memory store.
fn list_recent_sql() -> String {
    format!("SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY created_at DESC NULLS LAST, id DESC")
}

#[derive(Clone)]
pub struct PgInvoiceRepository {
    pool: PgPool,
}

impl PgInvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `invoices` table when it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(include_str!("../../migrations/0001_create_invoices.sql"))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl InvoiceRepository for PgInvoiceRepository {
    async fn insert(&self, data: &InvoiceData) -> Result<Invoice, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO invoices (receipt_no, received_from, patient_name, optometrist, items,
                                  total_amount, amount_in_words, location, date, receiver)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {INVOICE_COLUMNS}
            "#
        );

        let result = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(&data.receipt_no)
            .bind(&data.received_from)
            .bind(&data.patient_name)
            .bind(&data.optometrist)
            .bind(Json(&data.items))
            .bind(data.total_amount)
            .bind(&data.amount_in_words)
            .bind(&data.location)
            .bind(&data.date)
            .bind(&data.receiver)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(RepositoryError::Duplicate(data.receipt_no.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_recent(&self) -> Result<Vec<Invoice>, RepositoryError> {
        let rows = sqlx::query_as::<_, InvoiceRow>(&list_recent_sql())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Invoice::from).collect())
    }

    async fn find_by_receipt_no(&self, receipt_no: &str) -> Result<Option<Invoice>, RepositoryError> {
        let sql = format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE receipt_no = $1");
        let row = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(receipt_no)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Invoice::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_query_puts_undated_rows_last() {
        let sql = list_recent_sql();
        assert!(sql.starts_with("SELECT id, receipt_no,"));
        assert!(sql.ends_with("ORDER BY created_at DESC NULLS LAST, id DESC"));
    }
}
