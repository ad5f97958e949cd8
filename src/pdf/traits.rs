use super::{GeneratedDocument, GeneratorError};
use crate::invoice::model::InvoiceData;

/// Turns a receipt into a PDF. Implementations may block.
pub trait DocumentRenderer {
    fn render(&self, data: &InvoiceData) -> Result<GeneratedDocument, GeneratorError>;
}
