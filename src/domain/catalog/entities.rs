use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::ValidationError;
use super::value_objects::{Bic, DisplayName, Iban, RouteCode};
use crate::domain::invoice::value_objects::Money;

/// Client - the party an invoice is addressed to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
  pub id: Uuid,
  pub name: DisplayName,
  pub address: String,
  pub city: Option<String>,
  pub tax_id: Option<String>,
  pub email: Option<String>,
  pub phone: Option<String>,
  pub logo_url: Option<String>,
}

impl Client {
  pub fn new(name: DisplayName, address: impl Into<String>) -> Self {
    Self {
      id: Uuid::new_v4(),
      name,
      address: address.into().trim().to_string(),
      city: None,
      tax_id: None,
      email: None,
      phone: None,
      logo_url: None,
    }
  }

  pub fn with_contact(mut self, email: Option<String>, phone: Option<String>) -> Self {
    self.email = non_blank(email);
    self.phone = non_blank(phone);
    self
  }

  pub fn with_registration(mut self, city: Option<String>, tax_id: Option<String>) -> Self {
    self.city = non_blank(city);
    self.tax_id = non_blank(tax_id);
    self
  }

  pub fn with_logo(mut self, logo_url: Option<String>) -> Self {
    self.logo_url = non_blank(logo_url);
    self
  }

  /// Short client number printed on invoices, e.g. `CLT-1A2B3C4D`
  pub fn reference(&self) -> String {
    let simple = self.id.simple().to_string().to_uppercase();
    format!("CLT-{}", &simple[..8])
  }
}

/// Catalog item - a product or service with a list price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
  pub id: Uuid,
  pub name: DisplayName,
  pub unit_price: Money,
  pub description: String,
}

impl CatalogItem {
  pub fn new(name: DisplayName, unit_price: Money, description: impl Into<String>) -> Self {
    Self {
      id: Uuid::new_v4(),
      name,
      unit_price,
      description: description.into(),
    }
  }
}

/// Delivery route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRoute {
  pub id: Uuid,
  pub code: RouteCode,
  pub name: DisplayName,
}

impl DeliveryRoute {
  pub fn new(code: RouteCode, name: DisplayName) -> Self {
    Self {
      id: Uuid::new_v4(),
      code,
      name,
    }
  }

  /// `RT001 - Downtown Route`
  pub fn label(&self) -> String {
    format!("{} - {}", self.code.as_str(), self.name.as_str())
  }
}

/// Bank account that receives bank transfer payments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
  pub id: Uuid,
  pub name: DisplayName,
  pub iban: Iban,
  pub bic: Bic,
  pub updated_at: DateTime<Utc>,
}

impl BankAccount {
  pub fn new(name: DisplayName, iban: Iban, bic: Bic) -> Self {
    Self {
      id: Uuid::new_v4(),
      name,
      iban,
      bic,
      updated_at: Utc::now(),
    }
  }

  pub fn update(&mut self, name: DisplayName, iban: Iban, bic: Bic) {
    self.name = name;
    self.iban = iban;
    self.bic = bic;
    self.updated_at = Utc::now();
  }

  /// Builds an account from raw strings, validating every field.
  pub fn parse(name: &str, iban: &str, bic: &str) -> Result<Self, ValidationError> {
    Ok(Self::new(
      DisplayName::new(name)?,
      Iban::new(iban)?,
      Bic::new(bic)?,
    ))
  }
}

fn non_blank(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::value_objects::Currency;
  use rust_decimal_macros::dec;

  #[test]
  fn test_client_builder_drops_blank_fields() {
    let client = Client::new(DisplayName::new("Acme Corp").unwrap(), "123 Business St")
      .with_contact(Some("contact@acme.com".to_string()), Some("  ".to_string()))
      .with_registration(None, Some("38396013501745".to_string()));

    assert_eq!(client.email.as_deref(), Some("contact@acme.com"));
    assert!(client.phone.is_none());
    assert!(client.city.is_none());
    assert_eq!(client.tax_id.as_deref(), Some("38396013501745"));
  }

  #[test]
  fn test_client_reference() {
    let client = Client::new(DisplayName::new("Acme Corp").unwrap(), "");
    let reference = client.reference();
    assert!(reference.starts_with("CLT-"));
    assert_eq!(reference.len(), 12);
    assert_eq!(reference, client.reference());
  }

  #[test]
  fn test_route_label() {
    let route = DeliveryRoute::new(
      RouteCode::new("RT001").unwrap(),
      DisplayName::new("Downtown Route").unwrap(),
    );
    assert_eq!(route.label(), "RT001 - Downtown Route");
  }

  #[test]
  fn test_catalog_item() {
    let item = CatalogItem::new(
      DisplayName::new("Product A").unwrap(),
      Money::new(dec!(100), Currency::EUR).unwrap(),
      "High quality product",
    );
    assert_eq!(item.unit_price.amount, dec!(100));
  }

  #[test]
  fn test_bank_account_update() {
    let mut account =
      BankAccount::parse("Bank One", "DE89370400440532013000", "DEUTDEFF").unwrap();
    let before = account.updated_at;

    account.update(
      DisplayName::new("Bank Two").unwrap(),
      Iban::new("GB82WEST12345698765432").unwrap(),
      Bic::new("WESTGB2L").unwrap(),
    );

    assert_eq!(account.name.as_str(), "Bank Two");
    assert_eq!(account.iban.as_str(), "GB82WEST12345698765432");
    assert!(account.updated_at >= before);
  }

  #[test]
  fn test_bank_account_parse_rejects_bad_iban() {
    assert!(BankAccount::parse("Bank", "FR76 1234", "BNPAFRPP").is_err());
  }
}
