use chrono::NaiveDate;

use super::document::InvoiceDocument;
use super::errors::InvoiceError;
use super::value_objects::InvoiceNumber;

/// Hands out invoice numbers for a generation date.
pub trait InvoiceNumberGenerator: Send + Sync {
  /// Consumes a number; successive calls never return the same value twice in a row.
  fn next_number(&self, date: NaiveDate) -> Result<InvoiceNumber, InvoiceError>;

  /// What the next number could look like, without consuming anything.
  fn preview(&self, date: NaiveDate) -> String;
}

/// Turns a finalized document view into printable HTML.
pub trait DocumentRenderer: Send + Sync {
  fn render_invoice(&self, document: &InvoiceDocument) -> Result<String, InvoiceError>;
}
