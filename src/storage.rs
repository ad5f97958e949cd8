//! Invoice persistence seam.
//!
//! Handlers talk to an [`InvoiceRepository`]; production wires in the
//! Postgres implementation from [`crate::db`], tests and `INVOICE_STORE=memory`
//! use [`InMemoryInvoiceRepository`].

use async_trait::async_trait;
use parking_lot::RwLock;
use thiserror::Error;

use crate::invoice::model::{Invoice, InvoiceData};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("receipt number '{0}' already exists")]
    Duplicate(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait InvoiceRepository {
    /// Store a new invoice. Receipt numbers are unique.
    async fn insert(&self, data: &InvoiceData) -> Result<Invoice, RepositoryError>;

    /// All invoices, newest first.
    async fn list_recent(&self) -> Result<Vec<Invoice>, RepositoryError>;

    async fn find_by_receipt_no(&self, receipt_no: &str) -> Result<Option<Invoice>, RepositoryError>;
}

#[derive(Default)]
pub struct InMemoryInvoiceRepository {
    invoices: RwLock<Vec<Invoice>>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn insert(&self, data: &InvoiceData) -> Result<Invoice, RepositoryError> {
        let mut invoices = self.invoices.write();
        if invoices.iter().any(|i| i.receipt_no == data.receipt_no) {
            return Err(RepositoryError::Duplicate(data.receipt_no.clone()));
        }

        let id = invoices.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        let invoice = Invoice::from_data(id, data, chrono::Utc::now());
        invoices.push(invoice.clone());
        Ok(invoice)
    }

    async fn list_recent(&self) -> Result<Vec<Invoice>, RepositoryError> {
        let mut invoices = self.invoices.read().clone();
        // Ties on created_at fall back to insertion order.
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(invoices)
    }

    async fn find_by_receipt_no(&self, receipt_no: &str) -> Result<Option<Invoice>, RepositoryError> {
        Ok(self
            .invoices
            .read()
            .iter()
            .find(|i| i.receipt_no == receipt_no)
            .cloned())
    }
}
