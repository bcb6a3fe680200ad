use super::value_objects::ValueObjectError;
use crate::domain::catalog::CatalogError;
use thiserror::Error;
use uuid::Uuid;

/// Rule violations raised by the draft entity itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvoiceEntityError {
  #[error("Line item not found: {0}")]
  LineItemNotFound(Uuid),

  #[error("Payment not found at position {0}")]
  PaymentNotFound(usize),

  #[error("A bank account can only be attached to a bank transfer payment")]
  BankAccountNotAllowed,

  #[error("A custom name can only be set on a custom line item")]
  CustomNameNotAllowed,

  #[error("Custom name cannot exceed {max} characters")]
  CustomNameTooLong { max: usize },
}

#[derive(Debug, Error)]
pub enum InvoiceError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error(transparent)]
  Entity(#[from] InvoiceEntityError),

  #[error("Catalog error: {0}")]
  Catalog(#[from] CatalogError),

  #[error("Invoice has not been generated yet")]
  NotFinalized,

  #[error("Invoice numbering failed: {0}")]
  Numbering(String),

  #[error("No invoice numbers left for {month:02}/{year}")]
  SequenceExhausted { month: u32, year: i32 },

  #[error("Rendering failed: {0}")]
  Rendering(String),

  #[error("Internal error: {0}")]
  Internal(String),
}
