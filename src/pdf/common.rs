//! Common utilities for receipt generation.

use chrono::{Datelike, Local, NaiveDate};
use std::path::Path;

use crate::invoice::form::group_thousands;

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Format current date in Indonesian format (e.g., "1 Agustus 2025").
pub fn format_indonesian_date() -> String {
    indonesian_date(Local::now().date_naive())
}

pub fn indonesian_date(date: NaiveDate) -> String {
    let month = MONTHS[(date.month0() as usize).min(MONTHS.len() - 1)];
    format!("{} {} {}", date.day(), month, date.year())
}

/// Rupiah amount with dot thousands separators, without the "Rp" prefix.
pub fn format_rupiah(amount: i64) -> String {
    let grouped = group_thousands(&amount.unsigned_abs().to_string());
    if amount < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Escape special characters for Typst strings.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\n', r"\n")
}

/// Sanitize a string for use in filenames.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut last_dash = false;

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch);
            last_dash = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_' || ch == '/') && !last_dash && !result.is_empty() {
            result.push('-');
            last_dash = true;
        }
    }

    let result = result.trim_matches('-');
    if result.is_empty() {
        return fallback.to_string();
    }
    result.to_string()
}

/// Download name of a receipt, e.g. `invoice-INV-001.pdf`.
pub fn invoice_filename(receipt_no: &str) -> String {
    format!("invoice-{}.pdf", sanitize_filename(receipt_no, "tanpa-nomor"))
}

pub fn get_static_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}
