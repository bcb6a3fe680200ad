use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid invoice number: {0}")]
  InvalidInvoiceNumber(String),
  #[error("Invalid currency code: {0}")]
  InvalidCurrency(String),
  #[error("Invalid amount: {0}")]
  InvalidAmount(String),
  #[error("Invalid quantity: {0}")]
  InvalidQuantity(String),
  #[error("Invalid tax rate: {0}")]
  InvalidTaxRate(String),
  #[error("Invalid payment method: {0}")]
  InvalidPaymentMethod(String),
  #[error("Invalid item selection: {0}")]
  InvalidItemSelection(String),
  #[error("Invalid reference: {0}")]
  InvalidReference(String),
  #[error("Invalid date: {0}")]
  InvalidDate(String),
}

// Invoice Number - assigned on generation, never typed by the user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
  pub fn new(value: String) -> Result<Self, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidInvoiceNumber(
        "Invoice number cannot be empty".to_string(),
      ));
    }
    if trimmed.len() > 100 {
      return Err(ValueObjectError::InvalidInvoiceNumber(
        "Invoice number cannot exceed 100 characters".to_string(),
      ));
    }
    if !trimmed
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
    {
      return Err(ValueObjectError::InvalidInvoiceNumber(
        "Invoice number may only contain letters, digits, '-' and '_'".to_string(),
      ));
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn value(&self) -> &str {
    &self.0
  }

}

impl fmt::Display for InvoiceNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Invoice Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
  Draft,
  Finalized,
}

impl InvoiceStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      InvoiceStatus::Draft => "draft",
      InvoiceStatus::Finalized => "finalized",
    }
  }
}

// Currency - ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
  USD,
  EUR,
  GBP,
  DKK,
  SEK,
  NOK,
}

impl Currency {
  pub fn as_str(&self) -> &'static str {
    match self {
      Currency::USD => "USD",
      Currency::EUR => "EUR",
      Currency::GBP => "GBP",
      Currency::DKK => "DKK",
      Currency::SEK => "SEK",
      Currency::NOK => "NOK",
    }
  }

  pub fn symbol(&self) -> &'static str {
    match self {
      Currency::USD => "$",
      Currency::EUR => "€",
      Currency::GBP => "£",
      Currency::DKK => "kr",
      Currency::SEK => "kr",
      Currency::NOK => "kr",
    }
  }
}

impl FromStr for Currency {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_uppercase().as_str() {
      "USD" => Ok(Currency::USD),
      "EUR" => Ok(Currency::EUR),
      "GBP" => Ok(Currency::GBP),
      "DKK" => Ok(Currency::DKK),
      "SEK" => Ok(Currency::SEK),
      "NOK" => Ok(Currency::NOK),
      _ => Err(ValueObjectError::InvalidCurrency(format!(
        "Unsupported currency: {}",
        s
      ))),
    }
  }
}

// Money - Amount with currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
  pub amount: Decimal,
  pub currency: Currency,
}

impl Money {
  const MAX_SCALE: u32 = 2;
  /// Upper bound for a single amount; keeps line and invoice totals well inside `Decimal` range.
  pub const MAX_AMOUNT: Decimal = dec!(999999999.99);

  pub fn new(amount: Decimal, currency: Currency) -> Result<Self, ValueObjectError> {
    if amount.is_sign_negative() && !amount.is_zero() {
      return Err(ValueObjectError::InvalidAmount(
        "Amount cannot be negative".to_string(),
      ));
    }
    if amount.normalize().scale() > Self::MAX_SCALE {
      return Err(ValueObjectError::InvalidAmount(
        "Amount cannot have more than 2 decimal places".to_string(),
      ));
    }
    if amount > Self::MAX_AMOUNT {
      return Err(ValueObjectError::InvalidAmount(format!(
        "Amount cannot exceed {}",
        Self::MAX_AMOUNT
      )));
    }
    Ok(Self { amount, currency })
  }

  /// Parses raw form input such as `"12.50"`. Commas are accepted as the decimal separator.
  pub fn parse(raw: &str, currency: Currency) -> Result<Self, ValueObjectError> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
      return Err(ValueObjectError::InvalidAmount(
        "Amount is required".to_string(),
      ));
    }
    let amount = Decimal::from_str(&normalized)
      .map_err(|_| ValueObjectError::InvalidAmount(format!("'{}' is not a number", raw.trim())))?;
    Self::new(amount, currency)
  }

  pub fn zero(currency: Currency) -> Self {
    Self {
      amount: Decimal::ZERO,
      currency,
    }
  }

  /// Sum of two amounts in the same currency; saturates instead of overflowing.
  pub fn plus(&self, other: &Money) -> Money {
    debug_assert_eq!(self.currency, other.currency);
    Money {
      amount: self.amount.saturating_add(other.amount),
      currency: self.currency,
    }
  }

  pub fn multiply(&self, factor: Decimal) -> Money {
    Money {
      amount: self.amount.saturating_mul(factor),
      currency: self.currency,
    }
  }

  /// Fixed two-decimal display followed by the currency symbol, e.g. `240.00€`.
  pub fn format_suffixed(&self) -> String {
    format_amount(Some(self.amount), self.currency)
  }
}

impl fmt::Display for Money {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.format_suffixed())
  }
}

/// Formats an optional amount; absence renders as a zero amount, never blank.
pub fn format_amount(amount: Option<Decimal>, currency: Currency) -> String {
  let rounded = amount
    .unwrap_or(Decimal::ZERO)
    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
  format!("{:.2}{}", rounded, currency.symbol())
}

// Quantity - whole units only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
  pub const MAX: u32 = 1_000_000;

  pub fn new(value: u32) -> Result<Self, ValueObjectError> {
    if value == 0 {
      return Err(ValueObjectError::InvalidQuantity(
        "Quantity must be positive".to_string(),
      ));
    }
    if value > Self::MAX {
      return Err(ValueObjectError::InvalidQuantity(format!(
        "Quantity cannot exceed {}",
        Self::MAX
      )));
    }
    Ok(Self(value))
  }

  pub fn one() -> Self {
    Self(1)
  }

  pub fn parse(raw: &str) -> Result<Self, ValueObjectError> {
    let trimmed = raw.trim();
    let value = trimmed.parse::<u32>().map_err(|_| {
      ValueObjectError::InvalidQuantity(format!("'{}' is not a positive whole number", trimmed))
    })?;
    Self::new(value)
  }

  pub fn value(&self) -> u32 {
    self.0
  }

  pub fn as_decimal(&self) -> Decimal {
    Decimal::from(self.0)
  }
}

// Tax Rate - stored as a fraction (0.20 == 20%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(Decimal);

impl TaxRate {
  pub fn new(value: Decimal) -> Result<Self, ValueObjectError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
      return Err(ValueObjectError::InvalidTaxRate(
        "Tax rate must be between 0 and 1".to_string(),
      ));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> Decimal {
    self.0
  }

  pub fn as_percent(&self) -> Decimal {
    self.0 * Decimal::ONE_HUNDRED
  }

  /// `20.00%`
  pub fn format_percent(&self) -> String {
    format!(
      "{:.2}%",
      self
        .as_percent()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
  }
}

// Payment Method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
  BankTransfer,
  CreditCard,
  Cash,
}

impl PaymentMethod {
  pub fn as_str(&self) -> &'static str {
    match self {
      PaymentMethod::BankTransfer => "bank_transfer",
      PaymentMethod::CreditCard => "credit_card",
      PaymentMethod::Cash => "cash",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      PaymentMethod::BankTransfer => "Bank Transfer",
      PaymentMethod::CreditCard => "Credit Card",
      PaymentMethod::Cash => "Cash",
    }
  }

  pub fn is_bank_transfer(&self) -> bool {
    matches!(self, PaymentMethod::BankTransfer)
  }
}

impl FromStr for PaymentMethod {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "bank_transfer" => Ok(PaymentMethod::BankTransfer),
      "credit_card" => Ok(PaymentMethod::CreditCard),
      "cash" => Ok(PaymentMethod::Cash),
      _ => Err(ValueObjectError::InvalidPaymentMethod(format!(
        "Unknown payment method: {}",
        s
      ))),
    }
  }
}

// Where a line item's name and price come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "item_id", rename_all = "snake_case")]
pub enum LineItemSource {
  Unselected,
  Catalog(Uuid),
  Custom,
}

impl LineItemSource {
  pub const CUSTOM_SENTINEL: &'static str = "custom";

  /// Parses the value of the item dropdown: empty, `custom`, or a catalog item id.
  pub fn parse(raw: &str) -> Result<Self, ValueObjectError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return Ok(LineItemSource::Unselected);
    }
    if trimmed.eq_ignore_ascii_case(Self::CUSTOM_SENTINEL) {
      return Ok(LineItemSource::Custom);
    }
    Uuid::parse_str(trimmed)
      .map(LineItemSource::Catalog)
      .map_err(|_| ValueObjectError::InvalidItemSelection(format!("Unknown item: {}", trimmed)))
  }

  pub fn as_form_value(&self) -> String {
    match self {
      LineItemSource::Unselected => String::new(),
      LineItemSource::Catalog(id) => id.to_string(),
      LineItemSource::Custom => Self::CUSTOM_SENTINEL.to_string(),
    }
  }

  pub fn is_custom(&self) -> bool {
    matches!(self, LineItemSource::Custom)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_invoice_number() {
    assert!(InvoiceNumber::new("FAC032025RT042".to_string()).is_ok());
    assert!(InvoiceNumber::new("".to_string()).is_err());
    assert!(InvoiceNumber::new("FAC/01".to_string()).is_err());
    assert_eq!(
      InvoiceNumber::new("  FAC012024RT001 ".to_string())
        .unwrap()
        .to_string(),
      "FAC012024RT001"
    );
  }

  #[test]
  fn test_currency() {
    assert_eq!(Currency::EUR.as_str(), "EUR");
    assert_eq!(Currency::EUR.symbol(), "€");
    assert_eq!(Currency::from_str("eur").unwrap(), Currency::EUR);
    assert!(Currency::from_str("JPY").is_err());
  }

  #[test]
  fn test_money() {
    let money = Money::new(dec!(100.50), Currency::EUR).unwrap();
    assert_eq!(money.amount, dec!(100.50));
    assert!(Money::new(dec!(-10), Currency::EUR).is_err());
    assert!(Money::new(dec!(1.005), Currency::EUR).is_err());
  }

  #[test]
  fn test_money_parse_rejects_garbage() {
    assert_eq!(
      Money::parse("12,5", Currency::EUR).unwrap().amount,
      dec!(12.5)
    );
    assert!(Money::parse("abc", Currency::EUR).is_err());
    assert!(Money::parse("", Currency::EUR).is_err());
    assert!(Money::parse("-3", Currency::EUR).is_err());
  }

  #[test]
  fn test_money_upper_bound() {
    assert!(Money::new(Money::MAX_AMOUNT, Currency::EUR).is_ok());
    assert!(Money::new(dec!(1000000000), Currency::EUR).is_err());
    assert!(Money::parse("999999999999999999999999", Currency::EUR).is_err());
  }

  #[test]
  fn test_money_arithmetic_saturates() {
    let huge = Money {
      amount: Decimal::MAX,
      currency: Currency::EUR,
    };
    let one = Money::new(dec!(1), Currency::EUR).unwrap();

    assert_eq!(huge.plus(&one).amount, Decimal::MAX);
    assert_eq!(huge.multiply(dec!(2)).amount, Decimal::MAX);
    assert_eq!(one.plus(&one).amount, dec!(2));
  }

  #[test]
  fn test_money_formatting() {
    assert_eq!(
      Money::new(dec!(200), Currency::EUR)
        .unwrap()
        .format_suffixed(),
      "200.00€"
    );
    assert_eq!(format_amount(None, Currency::EUR), "0.00€");
    assert_eq!(format_amount(Some(dec!(0.125)), Currency::EUR), "0.13€");
    assert_eq!(format_amount(Some(dec!(40.0000)), Currency::USD), "40.00$");
  }

  #[test]
  fn test_quantity() {
    assert!(Quantity::new(1).is_ok());
    assert!(Quantity::new(0).is_err());
    assert_eq!(Quantity::parse(" 3 ").unwrap().value(), 3);
    assert!(Quantity::parse("-1").is_err());
    assert!(Quantity::parse("1.5").is_err());
    assert!(Quantity::parse("two").is_err());
    assert!(Quantity::new(Quantity::MAX).is_ok());
    assert!(Quantity::parse("4000000000").is_err());
  }

  #[test]
  fn test_tax_rate() {
    assert!(TaxRate::new(dec!(0.20)).is_ok());
    assert!(TaxRate::new(dec!(0)).is_ok());
    assert!(TaxRate::new(dec!(-0.1)).is_err());
    assert!(TaxRate::new(dec!(1.5)).is_err());
    assert_eq!(TaxRate::new(dec!(0.2)).unwrap().format_percent(), "20.00%");
  }

  #[test]
  fn test_payment_method() {
    assert_eq!(
      PaymentMethod::from_str("bank_transfer").unwrap(),
      PaymentMethod::BankTransfer
    );
    assert_eq!(PaymentMethod::CreditCard.as_str(), "credit_card");
    assert!(PaymentMethod::from_str("cheque").is_err());
  }

  #[test]
  fn test_line_item_source_parse() {
    assert_eq!(
      LineItemSource::parse("").unwrap(),
      LineItemSource::Unselected
    );
    assert_eq!(
      LineItemSource::parse("custom").unwrap(),
      LineItemSource::Custom
    );
    let id = Uuid::new_v4();
    assert_eq!(
      LineItemSource::parse(&id.to_string()).unwrap(),
      LineItemSource::Catalog(id)
    );
    assert!(LineItemSource::parse("42").is_err());
  }
}
