use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::InvoiceEntityError;
use super::value_objects::{
  Currency, InvoiceNumber, InvoiceStatus, LineItemSource, Money, PaymentMethod, Quantity, TaxRate,
};
use crate::domain::catalog::entities::{BankAccount, CatalogItem};

// Invoice Item - one line of the invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
  pub id: Uuid,
  pub source: LineItemSource,
  /// Catalog name captured when the item was selected
  pub catalog_label: Option<String>,
  pub custom_name: Option<String>,
  pub quantity: Quantity,
  pub unit_price: Money,
}

/// Partial update of a line; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct LineItemPatch {
  pub quantity: Option<Quantity>,
  pub unit_price: Option<Money>,
  pub custom_name: Option<String>,
}

/// What the item dropdown of a line was switched to.
#[derive(Debug, Clone, Copy)]
pub enum ItemSelection<'a> {
  Unselected,
  Catalog(&'a CatalogItem),
  Custom,
}

impl InvoiceItem {
  const CUSTOM_NAME_MAX_LENGTH: usize = 255;

  pub fn new(currency: Currency) -> Self {
    Self {
      id: Uuid::new_v4(),
      source: LineItemSource::Unselected,
      catalog_label: None,
      custom_name: None,
      quantity: Quantity::one(),
      unit_price: Money::zero(currency),
    }
  }

  /// Always derived from the current quantity and unit price.
  pub fn total(&self) -> Money {
    self.unit_price.multiply(self.quantity.as_decimal())
  }

  pub fn apply(&mut self, patch: LineItemPatch) -> Result<(), InvoiceEntityError> {
    let custom_name = match patch.custom_name {
      Some(name) => {
        if !self.source.is_custom() {
          return Err(InvoiceEntityError::CustomNameNotAllowed);
        }
        let name = name.trim().to_string();
        if name.len() > Self::CUSTOM_NAME_MAX_LENGTH {
          return Err(InvoiceEntityError::CustomNameTooLong {
            max: Self::CUSTOM_NAME_MAX_LENGTH,
          });
        }
        Some((!name.is_empty()).then_some(name))
      }
      None => None,
    };

    if let Some(quantity) = patch.quantity {
      self.quantity = quantity;
    }
    if let Some(unit_price) = patch.unit_price {
      self.unit_price = unit_price;
    }
    if let Some(custom_name) = custom_name {
      self.custom_name = custom_name;
    }
    Ok(())
  }

  pub fn select(&mut self, selection: ItemSelection<'_>) {
    match selection {
      ItemSelection::Catalog(item) => {
        self.source = LineItemSource::Catalog(item.id);
        self.catalog_label = Some(item.name.as_str().to_string());
        self.custom_name = None;
        self.unit_price = item.unit_price;
      }
      ItemSelection::Custom => {
        self.source = LineItemSource::Custom;
        self.catalog_label = None;
        self.unit_price = Money::zero(self.unit_price.currency);
      }
      ItemSelection::Unselected => {
        self.source = LineItemSource::Unselected;
        self.catalog_label = None;
        self.custom_name = None;
      }
    }
  }

  /// Custom name wins over the catalog label.
  pub fn display_name(&self) -> Option<&str> {
    self
      .custom_name
      .as_deref()
      .filter(|_| self.source.is_custom())
      .or(self.catalog_label.as_deref())
  }
}

// Payment - one installment of the invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
  pub method: PaymentMethod,
  pub amount: Money,
  pub due_date: NaiveDate,
  pub bank_account_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentPatch {
  pub method: Option<PaymentMethod>,
  pub amount: Option<Money>,
  pub due_date: Option<NaiveDate>,
  /// `Some(None)` clears the account, `None` keeps it.
  pub bank_account_id: Option<Option<Uuid>>,
}

impl Payment {
  pub fn new(due_date: NaiveDate, currency: Currency) -> Self {
    Self {
      method: PaymentMethod::BankTransfer,
      amount: Money::zero(currency),
      due_date,
      bank_account_id: None,
    }
  }

  pub fn apply(&mut self, patch: PaymentPatch) -> Result<(), InvoiceEntityError> {
    let method = patch.method.unwrap_or(self.method);
    let switched = method != self.method;
    if matches!(patch.bank_account_id, Some(Some(_))) && !method.is_bank_transfer() && !switched {
      return Err(InvoiceEntityError::BankAccountNotAllowed);
    }

    self.method = method;
    if let Some(amount) = patch.amount {
      self.amount = amount;
    }
    if let Some(due_date) = patch.due_date {
      self.due_date = due_date;
    }
    if let Some(bank_account_id) = patch.bank_account_id {
      self.bank_account_id = bank_account_id;
    }
    if !self.method.is_bank_transfer() {
      self.bank_account_id = None;
    }
    Ok(())
  }
}

// Bank details copied by value at generation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDetails {
  pub account_id: Uuid,
  pub name: String,
  pub iban: String,
  pub iban_formatted: String,
  pub bic: String,
}

impl BankDetails {
  pub fn snapshot_of(account: &BankAccount) -> Self {
    Self {
      account_id: account.id,
      name: account.name.as_str().to_string(),
      iban: account.iban.as_str().to_string(),
      iban_formatted: account.iban.formatted(),
      bic: account.bic.as_str().to_string(),
    }
  }
}

// Invoice Totals - derived from the lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
  pub subtotal: Money,
  pub tax: Money,
  pub total: Money,
  pub tax_rate: TaxRate,
}

// Everything assigned by the generate action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finalization {
  pub number: InvoiceNumber,
  pub totals: InvoiceTotals,
  pub bank_details: Option<BankDetails>,
  pub generated_on: NaiveDate,
}

// Invoice - the document being edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
  id: Uuid,
  date: NaiveDate,
  client_id: Option<Uuid>,
  delivery_route_id: Option<Uuid>,
  currency: Currency,
  items: Vec<InvoiceItem>,
  payments: Vec<Payment>,
  finalization: Option<Finalization>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl Invoice {
  pub fn new(date: NaiveDate, currency: Currency) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      date,
      client_id: None,
      delivery_route_id: None,
      currency,
      items: Vec::new(),
      payments: Vec::new(),
      finalization: None,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn date(&self) -> NaiveDate {
    self.date
  }

  pub fn client_id(&self) -> Option<Uuid> {
    self.client_id
  }

  pub fn delivery_route_id(&self) -> Option<Uuid> {
    self.delivery_route_id
  }

  pub fn currency(&self) -> Currency {
    self.currency
  }

  pub fn items(&self) -> &[InvoiceItem] {
    &self.items
  }

  pub fn payments(&self) -> &[Payment] {
    &self.payments
  }

  pub fn finalization(&self) -> Option<&Finalization> {
    self.finalization.as_ref()
  }

  pub fn updated_at(&self) -> DateTime<Utc> {
    self.updated_at
  }

  pub fn status(&self) -> InvoiceStatus {
    if self.finalization.is_some() {
      InvoiceStatus::Finalized
    } else {
      InvoiceStatus::Draft
    }
  }

  pub fn item(&self, id: Uuid) -> Option<&InvoiceItem> {
    self.items.iter().find(|item| item.id == id)
  }

  pub fn first_payment(&self) -> Option<&Payment> {
    self.payments.first()
  }

  pub fn set_date(&mut self, date: NaiveDate) {
    self.date = date;
    self.touch();
  }

  pub fn set_client(&mut self, client_id: Option<Uuid>) {
    self.client_id = client_id;
    self.touch();
  }

  pub fn set_delivery_route(&mut self, delivery_route_id: Option<Uuid>) {
    self.delivery_route_id = delivery_route_id;
    self.touch();
  }

  pub fn add_item(&mut self) -> &InvoiceItem {
    self.items.push(InvoiceItem::new(self.currency));
    self.touch();
    &self.items[self.items.len() - 1]
  }

  /// Returns whether a line was removed; unknown ids leave the list as it was.
  pub fn remove_item(&mut self, id: Uuid) -> bool {
    let before = self.items.len();
    self.items.retain(|item| item.id != id);
    let removed = self.items.len() != before;
    if removed {
      self.touch();
    }
    removed
  }

  pub fn update_item(
    &mut self,
    id: Uuid,
    patch: LineItemPatch,
  ) -> Result<&InvoiceItem, InvoiceEntityError> {
    let index = self.item_index(id)?;
    self.items[index].apply(patch)?;
    self.touch();
    Ok(&self.items[index])
  }

  pub fn select_item(
    &mut self,
    id: Uuid,
    selection: ItemSelection<'_>,
  ) -> Result<&InvoiceItem, InvoiceEntityError> {
    let index = self.item_index(id)?;
    self.items[index].select(selection);
    self.touch();
    Ok(&self.items[index])
  }

  pub fn add_payment(&mut self, due_date: NaiveDate) -> usize {
    self.payments.push(Payment::new(due_date, self.currency));
    self.touch();
    self.payments.len() - 1
  }

  /// Returns whether a payment was removed; out-of-range positions are ignored.
  pub fn remove_payment(&mut self, index: usize) -> bool {
    if index >= self.payments.len() {
      return false;
    }
    self.payments.remove(index);
    self.touch();
    true
  }

  pub fn update_payment(
    &mut self,
    index: usize,
    patch: PaymentPatch,
  ) -> Result<&Payment, InvoiceEntityError> {
    let payment = self
      .payments
      .get_mut(index)
      .ok_or(InvoiceEntityError::PaymentNotFound(index))?;
    payment.apply(patch)?;
    self.touch();
    Ok(&self.payments[index])
  }

  /// Accounts referenced by bank transfer payments, in payment order.
  pub fn bank_transfer_account_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
    self
      .payments
      .iter()
      .filter(|payment| payment.method.is_bank_transfer())
      .filter_map(|payment| payment.bank_account_id)
  }

  pub fn finalize(&mut self, finalization: Finalization) {
    self.finalization = Some(finalization);
    self.updated_at = Utc::now();
  }

  fn item_index(&self, id: Uuid) -> Result<usize, InvoiceEntityError> {
    self
      .items
      .iter()
      .position(|item| item.id == id)
      .ok_or(InvoiceEntityError::LineItemNotFound(id))
  }

  // Any edit turns a generated invoice back into a draft
  fn touch(&mut self) {
    self.finalization = None;
    self.updated_at = Utc::now();
  }
}
