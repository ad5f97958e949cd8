//! Generator for the "Bukti Pembayaran" receipt.

use std::fs;

use super::common::{escape_typst_string, format_rupiah, get_static_dir, invoice_filename};
use super::engine::TypstRenderEngine;
use super::traits::DocumentRenderer;
use super::{GeneratedDocument, GeneratorError};
use crate::invoice::model::{InvoiceData, InvoiceItem};

const TEMPLATE_FILE: &str = "kwitansi.typ";
const FUNCTION_CALL: &str = "#kwitansi()";

pub struct ReceiptGenerator {
    template: String,
    engine: TypstRenderEngine,
}

impl ReceiptGenerator {
    /// Load the template from the static directory.
    pub fn new(engine: TypstRenderEngine) -> Result<Self, GeneratorError> {
        let template_path = get_static_dir().join(TEMPLATE_FILE);
        let template = fs::read_to_string(&template_path).map_err(GeneratorError::TemplateIo)?;
        Ok(Self::from_template(template, engine))
    }

    pub fn from_template(template: String, engine: TypstRenderEngine) -> Self {
        Self { template, engine }
    }

    /// Full Typst source for `data`: the parameter block with the receipt's
    /// values, the template body, then the call.
    pub fn render_source(&self, data: &InvoiceData) -> String {
        format!(
            r#"#let kwitansi(
  data: (
    receipt_no: "{}",
    received_from: "{}",
    patient_name: "{}",
    optometrist: "{}",
    total: "{}",
    terbilang: "{}",
    location: "{}",
    date: "{}",
    receiver: "{}",
  ),
  items: ({}),
) = {{
{}

{}
"#,
            escape_typst_string(&data.receipt_no),
            escape_typst_string(&data.received_from),
            escape_typst_string(&data.patient_name),
            escape_typst_string(&data.optometrist),
            format_rupiah(data.total_amount),
            escape_typst_string(&data.amount_in_words),
            escape_typst_string(&data.location),
            escape_typst_string(&data.date),
            escape_typst_string(&data.receiver),
            render_items(&data.items),
            self.extract_function_body(),
            FUNCTION_CALL,
        )
    }

    fn extract_function_body(&self) -> &str {
        if let Some(start) = self.template.find(") = {") {
            let body_start = start + 5;
            if let Some(end) = self.template.rfind(FUNCTION_CALL) {
                if end > body_start {
                    return self.template[body_start..end].trim_end();
                }
            }
        }
        log::warn!("{} has no function body marker, using it verbatim", TEMPLATE_FILE);
        &self.template
    }
}

/// Typst array literal of item dictionaries. Every element carries a
/// trailing comma so a single item still parses as an array.
fn render_items(items: &[InvoiceItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                r#"(label: "{}", details: "{}", amount: "{}"),"#,
                escape_typst_string(&item.label),
                escape_typst_string(&item.details),
                format_rupiah(item.amount),
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl DocumentRenderer for ReceiptGenerator {
    fn render(&self, data: &InvoiceData) -> Result<GeneratedDocument, GeneratorError> {
        let source = self.render_source(data);
        let pdf = self.engine.render(&source)?;

        Ok(GeneratedDocument {
            filename: invoice_filename(&data.receipt_no),
            pdf,
        })
    }
}
