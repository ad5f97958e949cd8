use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::terbilang;

/// One line on the receipt, e.g. the frame or the lenses.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    #[schema(example = "Jenis Frame")]
    pub label: String,
    #[schema(example = "Titanium Full Rim")]
    pub details: String,
    #[schema(example = 130000)]
    pub amount: i64,
}

/// Everything printed on a receipt. This is also the body of `POST /api/pdf`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceData {
    #[schema(example = "INV-001")]
    pub receipt_no: String,
    #[schema(example = "Fajar")]
    pub received_from: String,
    #[schema(example = "Sidik")]
    pub patient_name: String,
    #[schema(example = "Prasetio")]
    pub optometrist: String,
    pub items: Vec<InvoiceItem>,
    #[schema(example = 480000)]
    pub total_amount: i64,
    /// Left blank to let the server spell the total.
    #[serde(default)]
    #[schema(example = "Empat Ratus Delapan Puluh Ribu Rupiah")]
    pub amount_in_words: String,
    #[schema(example = "Bekasi")]
    pub location: String,
    #[schema(example = "1 Agustus 2025")]
    pub date: String,
    #[schema(example = "Nursafaat, Amd.RO")]
    pub receiver: String,
}

impl InvoiceData {
    /// The built-in demo receipt rendered by `GET /api/pdf` without an id.
    pub fn sample(receipt_no: &str) -> Self {
        let items = vec![
            InvoiceItem {
                label: "Jenis Frame".to_string(),
                details: "sjfksfjefsk".to_string(),
                amount: 130_000,
            },
            InvoiceItem {
                label: "Jenis Lensa".to_string(),
                details: "fuoiejnskj".to_string(),
                amount: 350_000,
            },
        ];
        let total_amount = items.iter().map(|item| item.amount).sum();

        Self {
            receipt_no: receipt_no.to_string(),
            received_from: "Fajar".to_string(),
            patient_name: "Sidik".to_string(),
            optometrist: "Prasetio".to_string(),
            items,
            total_amount,
            amount_in_words: terbilang::convert_signed(total_amount).unwrap_or_default(),
            location: "Bekasi".to_string(),
            date: "1 Agustus 2025".to_string(),
            receiver: "Nursafaat, Amd.RO".to_string(),
        }
    }

    /// Fill `amount_in_words` from the total when the caller left it blank.
    /// Words supplied by the caller are kept verbatim.
    pub fn fill_amount_in_words(&mut self) -> Result<(), terbilang::TerbilangError> {
        if self.amount_in_words.trim().is_empty() {
            self.amount_in_words = terbilang::convert_signed(self.total_amount)?;
        }
        Ok(())
    }
}

/// A stored invoice as listed in the history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: i32,
    pub receipt_no: String,
    pub received_from: String,
    pub patient_name: String,
    pub optometrist: String,
    pub items: Vec<InvoiceItem>,
    pub total_amount: i64,
    pub amount_in_words: String,
    pub location: String,
    pub date: String,
    pub receiver: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Invoice {
    pub fn from_data(id: i32, data: &InvoiceData, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            receipt_no: data.receipt_no.clone(),
            received_from: data.received_from.clone(),
            patient_name: data.patient_name.clone(),
            optometrist: data.optometrist.clone(),
            items: data.items.clone(),
            total_amount: data.total_amount,
            amount_in_words: data.amount_in_words.clone(),
            location: data.location.clone(),
            date: data.date.clone(),
            receiver: data.receiver.clone(),
            created_at: Some(created_at),
        }
    }

    /// Rebuild the printable receipt from the stored row.
    pub fn to_data(&self) -> InvoiceData {
        InvoiceData {
            receipt_no: self.receipt_no.clone(),
            received_from: self.received_from.clone(),
            patient_name: self.patient_name.clone(),
            optometrist: self.optometrist.clone(),
            items: self.items.clone(),
            total_amount: self.total_amount,
            amount_in_words: self.amount_in_words.clone(),
            location: self.location.clone(),
            date: self.date.clone(),
            receiver: self.receiver.clone(),
        }
    }
}

/// Response of `GET /api/terbilang`.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct TerbilangResponse {
    #[schema(example = 130000)]
    pub amount: i64,
    #[schema(example = "Seratus Tiga Puluh Ribu Rupiah")]
    pub words: String,
}
