use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("Client not found: {0}")]
  ClientNotFound(Uuid),

  #[error("Item not found: {0}")]
  ItemNotFound(Uuid),

  #[error("Delivery route not found: {0}")]
  DeliveryRouteNotFound(Uuid),

  #[error("Bank account not found: {0}")]
  BankAccountNotFound(Uuid),

  #[error("Validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error("Repository error: {0}")]
  Repository(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("Name cannot be empty")]
  NameEmpty,

  #[error("Name must be at most {max} characters")]
  NameTooLong { max: usize },

  #[error("Route code must be between 1 and {max} characters")]
  RouteCodeInvalidLength { max: usize },

  #[error("Route code may only contain letters, digits and '-'")]
  RouteCodeInvalidCharacters,

  #[error("IBAN must be between {min} and {max} characters")]
  IbanInvalidLength { min: usize, max: usize },

  #[error("IBAN has an invalid format")]
  IbanInvalidFormat,

  #[error("IBAN checksum is invalid")]
  IbanInvalidChecksum,

  #[error("BIC must be 8 or 11 characters")]
  BicInvalidLength,

  #[error("BIC has an invalid format")]
  BicInvalidFormat,

  #[error("Invalid price: {0}")]
  InvalidPrice(String),
}
