//! Input validation for receipts.
//!
//! Errors are collected rather than returned on the first failure so staff
//! see every missing field at once. Messages are in Indonesian, matching
//! the form labels.

use std::fmt;

use super::model::InvoiceData;

/// Trait for validating request objects.
pub trait Validator {
    fn validate(&self) -> Result<(), String>;
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} tidak boleh kosong", label)).with_suggestion(format!(
            "Mohon isi {} dengan data yang valid",
            label.to_lowercase()
        ))
    }

    pub fn negative_amount(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} tidak boleh negatif", label))
            .with_suggestion("Masukkan nominal dalam rupiah, contoh: 130000")
    }

    pub fn no_items(field: &str) -> Self {
        Self::new(field, "Rincian pembayaran tidak boleh kosong")
            .with_suggestion("Tambahkan minimal satu item, contoh: Jenis Frame")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// One message listing every error, numbered.
    pub fn to_message(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "Validasi gagal: {} kesalahan ditemukan\n",
            self.errors.len()
        )];

        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }

        parts.push(String::new());
        parts.push("Mohon perbaiki data di atas dan coba lagi.".to_string());

        parts.join("\n")
    }

    pub fn into_result(self) -> Result<(), String> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.to_message())
        }
    }
}

pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

pub fn validate_non_negative(value: i64, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value < 0 {
        errors.add(ValidationError::negative_amount(field, label));
    }
}

impl Validator for InvoiceData {
    fn validate(&self) -> Result<(), String> {
        let mut errors = ValidationErrors::new();

        validate_required(&self.receipt_no, "receiptNo", "No Transaksi", &mut errors);
        validate_required(&self.received_from, "receivedFrom", "Diterima Dari", &mut errors);
        validate_required(&self.patient_name, "patientName", "Nama Pasien", &mut errors);
        validate_required(&self.optometrist, "optometrist", "Pemeriksa (Optometris)", &mut errors);
        validate_required(&self.location, "location", "Lokasi", &mut errors);
        validate_required(&self.date, "date", "Tanggal", &mut errors);
        validate_required(&self.receiver, "receiver", "Yang Menerima", &mut errors);

        if self.items.is_empty() {
            errors.add(ValidationError::no_items("items"));
        }
        for (i, item) in self.items.iter().enumerate() {
            validate_required(&item.label, &format!("items[{i}].label"), "Nama item", &mut errors);
            validate_non_negative(item.amount, &format!("items[{i}].amount"), "Harga item", &mut errors);
        }

        validate_non_negative(self.total_amount, "totalAmount", "Total", &mut errors);

        errors.into_result()
    }
}
