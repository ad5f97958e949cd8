//! Database module - AppState and the Postgres invoice store.

mod invoice;

pub use invoice::PgInvoiceRepository;

use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{AppConfig, StoreBackend};
use crate::invoice::model::{Invoice, InvoiceData};
use crate::pdf::{DocumentRenderer, ReceiptGenerator, TypstRenderEngine};
use crate::storage::{InMemoryInvoiceRepository, InvoiceRepository, RepositoryError};

const HISTORY_CACHE_KEY: &str = "invoice_history";

#[derive(Clone)]
pub struct AppState {
    pub invoices: Arc<dyn InvoiceRepository + Send + Sync>,
    pub renderer: Arc<dyn DocumentRenderer + Send + Sync>,
    pub history_cache: Cache<String, Vec<Invoice>>,
    /// Bumped on every save; a history read only fills the cache if no
    /// save happened while it was querying the store.
    history_generation: Arc<AtomicU64>,
    pub config: AppConfig,
}

impl AppState {
    pub async fn new_with_config(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let invoices: Arc<dyn InvoiceRepository + Send + Sync> = match config.store {
            StoreBackend::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .ok_or("DATABASE_URL must be set")?;

                let pool = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(10)
                    .min_connections(1)
                    .acquire_timeout(Duration::from_secs(30))
                    .idle_timeout(Duration::from_secs(900))
                    .max_lifetime(Duration::from_secs(1800))
                    .connect(database_url)
                    .await?;

                let repository = PgInvoiceRepository::new(pool);
                repository.ensure_schema().await?;
                log::info!("Connected to Postgres invoice store");
                Arc::new(repository)
            }
            StoreBackend::Memory => {
                log::warn!("Using in-memory invoice store; invoices are lost on restart");
                Arc::new(InMemoryInvoiceRepository::new())
            }
        };

        let renderer = Arc::new(ReceiptGenerator::new(TypstRenderEngine::new(
            config.typst_bin.clone(),
        ))?);

        Ok(Self::new_with_parts(invoices, renderer, config))
    }

    pub fn new_with_parts(
        invoices: Arc<dyn InvoiceRepository + Send + Sync>,
        renderer: Arc<dyn DocumentRenderer + Send + Sync>,
        config: AppConfig,
    ) -> Self {
        let history_cache = Cache::builder()
            .time_to_live(Duration::from_secs(10 * 60))
            .max_capacity(10)
            .build();

        AppState {
            invoices,
            renderer,
            history_cache,
            history_generation: Arc::new(AtomicU64::new(0)),
            config,
        }
    }

    /// Invoice history, newest first. Served from the cache when warm.
    pub async fn get_invoice_history(&self) -> Result<Vec<Invoice>, RepositoryError> {
        if let Some(history) = self.history_cache.get(HISTORY_CACHE_KEY).await {
            log::debug!("Invoice history served from cache");
            return Ok(history);
        }

        let generation = self.history_generation.load(Ordering::Acquire);
        let history = self.invoices.list_recent().await?;
        if self.history_generation.load(Ordering::Acquire) == generation {
            self.history_cache
                .insert(HISTORY_CACHE_KEY.to_string(), history.clone())
                .await;
            // A save that landed between the check and the insert.
            if self.history_generation.load(Ordering::Acquire) != generation {
                self.history_cache.invalidate(HISTORY_CACHE_KEY).await;
            }
        }
        Ok(history)
    }

    pub async fn save_invoice(&self, data: &InvoiceData) -> Result<Invoice, RepositoryError> {
        let invoice = self.invoices.insert(data).await?;
        self.history_generation.fetch_add(1, Ordering::AcqRel);
        self.history_cache.invalidate(HISTORY_CACHE_KEY).await;
        Ok(invoice)
    }

    pub async fn find_invoice(&self, receipt_no: &str) -> Result<Option<Invoice>, RepositoryError> {
        self.invoices.find_by_receipt_no(receipt_no).await
    }
}
