//! Receipt PDF generation from Typst templates.
//!
//! - `receipt` fills the "Bukti Pembayaran" template with invoice data
//! - `engine` compiles Typst source to PDF through the `typst` CLI
//! - `common` holds formatting and escaping helpers

pub mod common;
pub mod engine;
pub mod receipt;
pub mod traits;

pub use engine::TypstRenderEngine;
pub use receipt::ReceiptGenerator;
pub use traits::DocumentRenderer;

use thiserror::Error;

/// Errors that can occur during document generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("failed to load Typst template: {0}")]
    TemplateIo(#[source] std::io::Error),
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {0}")]
    TypstExit(i32),
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
}

/// Result of a successful document generation.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub filename: String,
    pub pdf: Vec<u8>,
}

/// How the browser should treat the returned PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Open in the viewer (history preview).
    Inline,
    /// Force a download (form submission).
    Attachment,
}

impl Disposition {
    /// `Content-Disposition` header value for `filename`.
    pub fn header_value(&self, filename: &str) -> String {
        let kind = match self {
            Self::Inline => "inline",
            Self::Attachment => "attachment",
        };
        format!("{}; filename=\"{}\"", kind, filename)
    }
}
