//! Receipt form state.
//!
//! Staff type prices with thousands separators ("1.500.000"); the form keeps
//! those strings as typed and derives the total and its spelled-out form
//! from them on every change.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::model::{InvoiceData, InvoiceItem};
use crate::terbilang::{self, TerbilangError};

pub const DEFAULT_OPTOMETRIST: &str = "Kholidin, A.Md.RO";

fn default_optometrist() -> String {
    DEFAULT_OPTOMETRIST.to_string()
}

/// Group the digits of `value` in threes with dots, dropping anything else.
pub fn format_number(value: &str) -> String {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    group_thousands(&digits)
}

/// Parse a typed price, ignoring separators. Input without digits is 0;
/// a price too long for `u64` saturates so the total is rejected as out of
/// range instead of silently reading as zero.
pub fn parse_number(value: &str) -> u64 {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

pub(crate) fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Values the form shows under the price fields.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormTotals {
    #[schema(example = 480000)]
    pub total: u64,
    #[schema(example = "480.000")]
    pub total_formatted: String,
    #[schema(example = "Empat Ratus Delapan Puluh Ribu Rupiah")]
    pub in_words: String,
}

/// The "Buat Faktur" form as typed by staff.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptForm {
    #[schema(example = "INV-001")]
    pub transaction_no: String,
    pub received_from: String,
    pub patient_name: String,
    #[serde(default = "default_optometrist")]
    pub optometrist: String,
    #[serde(default)]
    pub paid_for: String,
    pub frame_type: String,
    #[schema(example = "130.000")]
    pub frame_price: String,
    pub lens_type: String,
    #[schema(example = "350.000")]
    pub lens_price: String,
}

impl Default for ReceiptForm {
    fn default() -> Self {
        Self {
            transaction_no: String::new(),
            received_from: String::new(),
            patient_name: String::new(),
            optometrist: default_optometrist(),
            paid_for: String::new(),
            frame_type: String::new(),
            frame_price: String::new(),
            lens_type: String::new(),
            lens_price: String::new(),
        }
    }
}

impl ReceiptForm {
    pub fn frame_amount(&self) -> u64 {
        parse_number(&self.frame_price)
    }

    pub fn lens_amount(&self) -> u64 {
        parse_number(&self.lens_price)
    }

    /// Recompute the total and its words from the current prices.
    pub fn totals(&self) -> Result<FormTotals, TerbilangError> {
        let total = self.frame_amount().saturating_add(self.lens_amount());
        Ok(FormTotals {
            total,
            total_formatted: group_thousands(&total.to_string()),
            in_words: terbilang::convert(total)?,
        })
    }

    /// Build the receipt payload the form submits.
    pub fn into_invoice_data(
        self,
        location: &str,
        date: &str,
        receiver: &str,
    ) -> Result<InvoiceData, TerbilangError> {
        let totals = self.totals()?;
        let to_i64 = |amount: u64| i64::try_from(amount).map_err(|_| TerbilangError::OutOfRange(amount));

        let items = vec![
            InvoiceItem {
                label: "Jenis Frame".to_string(),
                details: self.frame_type,
                amount: to_i64(parse_number(&self.frame_price))?,
            },
            InvoiceItem {
                label: "Jenis Lensa".to_string(),
                details: self.lens_type,
                amount: to_i64(parse_number(&self.lens_price))?,
            },
        ];

        Ok(InvoiceData {
            receipt_no: self.transaction_no,
            received_from: self.received_from,
            patient_name: self.patient_name,
            optometrist: self.optometrist,
            items,
            total_amount: to_i64(totals.total)?,
            amount_in_words: totals.in_words,
            location: location.to_string(),
            date: date.to_string(),
            receiver: receiver.to_string(),
        })
    }
}
