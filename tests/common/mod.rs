#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;

use optik_invoice_server::config::AppConfig;
use optik_invoice_server::invoice::model::{Invoice, InvoiceData};
use optik_invoice_server::pdf::common::invoice_filename;
use optik_invoice_server::pdf::{DocumentRenderer, GeneratedDocument, GeneratorError};
use optik_invoice_server::storage::{InMemoryInvoiceRepository, InvoiceRepository, RepositoryError};
use optik_invoice_server::AppState;

/// Renders a tiny fake PDF so HTTP tests do not need the Typst CLI.
pub struct FakeRenderer;

impl DocumentRenderer for FakeRenderer {
    fn render(&self, data: &InvoiceData) -> Result<GeneratedDocument, GeneratorError> {
        Ok(GeneratedDocument {
            filename: invoice_filename(&data.receipt_no),
            pdf: format!("%PDF-1.7 {} {}", data.receipt_no, data.amount_in_words).into_bytes(),
        })
    }
}

/// Always fails as if `typst` crashed.
pub struct FailingRenderer;

impl DocumentRenderer for FailingRenderer {
    fn render(&self, _data: &InvoiceData) -> Result<GeneratedDocument, GeneratorError> {
        Err(GeneratorError::TypstExit(1))
    }
}

/// Store whose every call fails, standing in for an unreachable database.
pub struct UnavailableRepository;

#[async_trait]
impl InvoiceRepository for UnavailableRepository {
    async fn insert(&self, _data: &InvoiceData) -> Result<Invoice, RepositoryError> {
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn list_recent(&self) -> Result<Vec<Invoice>, RepositoryError> {
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_receipt_no(&self, _receipt_no: &str) -> Result<Option<Invoice>, RepositoryError> {
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    }
}

pub fn memory_state() -> (AppState, Arc<InMemoryInvoiceRepository>) {
    let repository = Arc::new(InMemoryInvoiceRepository::new());
    let state = AppState::new_with_parts(repository.clone(), Arc::new(FakeRenderer), AppConfig::default());
    (state, repository)
}

pub fn state_with(
    repository: Arc<dyn InvoiceRepository + Send + Sync>,
    renderer: Arc<dyn DocumentRenderer + Send + Sync>,
) -> AppState {
    AppState::new_with_parts(repository, renderer, AppConfig::default())
}

/// In-memory store whose history query takes a snapshot and then stalls,
/// so a save can land while the query is still in flight.
pub struct SlowHistoryRepository {
    pub inner: InMemoryInvoiceRepository,
    pub delay: std::time::Duration,
}

#[async_trait]
impl InvoiceRepository for SlowHistoryRepository {
    async fn insert(&self, data: &InvoiceData) -> Result<Invoice, RepositoryError> {
        self.inner.insert(data).await
    }

    async fn list_recent(&self) -> Result<Vec<Invoice>, RepositoryError> {
        let snapshot = self.inner.list_recent().await;
        tokio::time::sleep(self.delay).await;
        snapshot
    }

    async fn find_by_receipt_no(&self, receipt_no: &str) -> Result<Option<Invoice>, RepositoryError> {
        self.inner.find_by_receipt_no(receipt_no).await
    }
}
