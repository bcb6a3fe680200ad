use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::invoice::ValueObjectError;

/// Invoice header form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HeaderForm {
  /// ISO date, `YYYY-MM-DD`
  #[validate(length(min = 1, max = 10, message = "Date is required"))]
  pub date: String,

  /// Client id, empty for none
  #[serde(default)]
  pub client_id: Option<String>,

  /// Delivery route id, empty for none
  #[serde(default)]
  pub delivery_route_id: Option<String>,
}

/// Line item form; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LineItemForm {
  #[validate(length(max = 12, message = "Quantity is too long"))]
  pub quantity: Option<String>,

  #[validate(length(max = 24, message = "Unit price is too long"))]
  pub unit_price: Option<String>,

  #[validate(length(max = 255, message = "Custom name must be at most 255 characters"))]
  pub custom_name: Option<String>,
}

/// Catalog selection for a line: an item id, `custom`, or empty
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SelectionForm {
  #[serde(default)]
  #[validate(length(max = 64, message = "Selection is too long"))]
  pub selection: String,
}

/// Payment form; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PaymentForm {
  #[validate(length(max = 32, message = "Payment method is too long"))]
  pub method: Option<String>,

  #[validate(length(max = 24, message = "Amount is too long"))]
  pub amount: Option<String>,

  pub due_date: Option<String>,

  /// Bank account id; empty clears the account
  pub bank_account_id: Option<String>,
}

/// Standard error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,

  /// Optional detailed error information
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}

/// Parses an HTML date input value
pub fn parse_date(raw: &str) -> Result<NaiveDate, ValueObjectError> {
  NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
    .map_err(|_| ValueObjectError::InvalidDate(raw.trim().to_string()))
}

/// Parses a select value where empty means "none"
pub fn parse_reference(raw: Option<&str>) -> Result<Option<Uuid>, ValueObjectError> {
  match raw.map(str::trim) {
    None | Some("") => Ok(None),
    Some(value) => Uuid::parse_str(value)
      .map(Some)
      .map_err(|_| ValueObjectError::InvalidReference(value.to_string())),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_date() {
    assert_eq!(
      parse_date("2025-03-14").unwrap(),
      NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    );
    assert!(matches!(
      parse_date("14/03/2025"),
      Err(ValueObjectError::InvalidDate(_))
    ));
  }

  #[test]
  fn test_parse_reference() {
    let id = Uuid::new_v4();
    assert_eq!(parse_reference(None).unwrap(), None);
    assert_eq!(parse_reference(Some("  ")).unwrap(), None);
    assert_eq!(parse_reference(Some(&id.to_string())).unwrap(), Some(id));
    assert!(parse_reference(Some("acme")).is_err());
  }

  #[test]
  fn test_custom_name_length_validation() {
    let form = LineItemForm {
      custom_name: Some("x".repeat(256)),
      ..Default::default()
    };
    assert!(form.validate().is_err());

    let form = LineItemForm {
      custom_name: Some("Pallet return".to_string()),
      quantity: Some("2".to_string()),
      ..Default::default()
    };
    assert!(form.validate().is_ok());
  }
}
