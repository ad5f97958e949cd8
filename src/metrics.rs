//! Application counters, exposed at `/metrics/invoices` next to the request
//! metrics served by the Prometheus middleware.

use actix_web::{HttpResponse, Responder};
use lazy_static::lazy_static;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

lazy_static! {
    pub static ref INVOICES_SAVED: IntCounter = register_int_counter!(
        "invoices_saved_total",
        "Invoices written to the store"
    )
    .expect("invoices_saved_total registers once");
    pub static ref INVOICE_SAVE_FAILURES: IntCounter = register_int_counter!(
        "invoice_save_failures_total",
        "Invoices that could not be stored; the PDF was still returned"
    )
    .expect("invoice_save_failures_total registers once");
    pub static ref PDF_RENDER_FAILURES: IntCounter = register_int_counter!(
        "pdf_render_failures_total",
        "Receipt renders that failed"
    )
    .expect("pdf_render_failures_total registers once");
}

/// Text exposition of every counter in the default registry.
pub fn gather_text() -> Result<String, prometheus::Error> {
    // Touch the counters so they appear even before the first increment.
    let _ = (
        INVOICES_SAVED.get(),
        INVOICE_SAVE_FAILURES.get(),
        PDF_RENDER_FAILURES.get(),
    );

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&prometheus::gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

pub async fn invoice_metrics() -> impl Responder {
    match gather_text() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(body),
        Err(e) => {
            log::error!("Failed to encode metrics: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}
