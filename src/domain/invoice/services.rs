use chrono::{Datelike, NaiveDate};
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::domain::catalog::entities::{Client, DeliveryRoute};
use crate::domain::catalog::errors::CatalogError;
use crate::domain::catalog::ports::CatalogRepository;

use super::document::{InvoiceDocument, IssuerProfile};
use super::entities::{
  BankDetails, Finalization, Invoice, InvoiceItem, InvoiceTotals, ItemSelection, Payment,
  PaymentPatch,
};
use super::errors::InvoiceError;
use super::ports::InvoiceNumberGenerator;
use super::value_objects::{Currency, InvoiceNumber, LineItemSource, Money, TaxRate};

/// Derives subtotal, tax and total from the lines at a flat tax rate.
#[derive(Debug, Clone, Copy)]
pub struct TotalsCalculator {
  tax_rate: TaxRate,
}

impl TotalsCalculator {
  pub fn new(tax_rate: TaxRate) -> Self {
    Self { tax_rate }
  }

  pub fn tax_rate(&self) -> TaxRate {
    self.tax_rate
  }

  pub fn calculate(&self, items: &[InvoiceItem], currency: Currency) -> InvoiceTotals {
    let subtotal = items
      .iter()
      .fold(Money::zero(currency), |acc, item| acc.plus(&item.total()));
    let tax = subtotal.multiply(self.tax_rate.value());
    let total = subtotal.plus(&tax);

    InvoiceTotals {
      subtotal,
      tax,
      total,
      tax_rate: self.tax_rate,
    }
  }
}

/// `<prefix><MM><YYYY><marker><NNN>`, e.g. `FAC032025RT042`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
  pub prefix: String,
  pub marker: String,
}

impl NumberFormat {
  pub const MAX_SEQUENCE: u16 = 999;

  pub fn new(prefix: impl Into<String>, marker: impl Into<String>) -> Self {
    Self {
      prefix: prefix.into(),
      marker: marker.into(),
    }
  }

  pub fn format(&self, date: NaiveDate, sequence: u16) -> String {
    format!("{}{:03}", self.period_prefix(date), sequence)
  }

  fn period_prefix(&self, date: NaiveDate) -> String {
    format!(
      "{}{:02}{:04}{}",
      self.prefix,
      date.month(),
      date.year(),
      self.marker
    )
  }
}

impl Default for NumberFormat {
  fn default() -> Self {
    Self::new("FAC", "RT")
  }
}

/// Draws the sequence uniformly from `0..=999`. Collisions across a month are
/// possible; the same number is never handed out twice in a row.
pub struct RandomSequenceGenerator {
  format: NumberFormat,
  last: Mutex<Option<String>>,
}

impl RandomSequenceGenerator {
  pub fn new(format: NumberFormat) -> Self {
    Self {
      format,
      last: Mutex::new(None),
    }
  }
}

impl InvoiceNumberGenerator for RandomSequenceGenerator {
  fn next_number(&self, date: NaiveDate) -> Result<InvoiceNumber, InvoiceError> {
    let mut last = self
      .last
      .lock()
      .map_err(|_| InvoiceError::Internal("Invoice number state poisoned".to_string()))?;

    let mut rng = rand::thread_rng();
    let number = loop {
      let candidate = self
        .format
        .format(date, rng.gen_range(0..=NumberFormat::MAX_SEQUENCE));
      if last.as_deref() != Some(candidate.as_str()) {
        break candidate;
      }
    };

    *last = Some(number.clone());
    InvoiceNumber::new(number).map_err(|e| InvoiceError::Numbering(e.to_string()))
  }

  fn preview(&self, date: NaiveDate) -> String {
    format!("{}XXX", self.format.period_prefix(date))
  }
}

/// In-memory counter per (year, month), starting at 001.
pub struct MonthlyCounterGenerator {
  format: NumberFormat,
  counters: Mutex<HashMap<(i32, u32), u16>>,
}

impl MonthlyCounterGenerator {
  pub fn new(format: NumberFormat) -> Self {
    Self {
      format,
      counters: Mutex::new(HashMap::new()),
    }
  }
}

impl InvoiceNumberGenerator for MonthlyCounterGenerator {
  fn next_number(&self, date: NaiveDate) -> Result<InvoiceNumber, InvoiceError> {
    let mut counters = self
      .counters
      .lock()
      .map_err(|_| InvoiceError::Internal("Invoice counter state poisoned".to_string()))?;

    let counter = counters.entry((date.year(), date.month())).or_insert(0);
    if *counter >= NumberFormat::MAX_SEQUENCE {
      return Err(InvoiceError::SequenceExhausted {
        month: date.month(),
        year: date.year(),
      });
    }
    *counter += 1;

    InvoiceNumber::new(self.format.format(date, *counter))
      .map_err(|e| InvoiceError::Numbering(e.to_string()))
  }

  fn preview(&self, date: NaiveDate) -> String {
    let next = self
      .counters
      .lock()
      .ok()
      .and_then(|counters| counters.get(&(date.year(), date.month())).copied())
      .unwrap_or(0)
      + 1;
    if next > NumberFormat::MAX_SEQUENCE {
      return format!("{}XXX", self.format.period_prefix(date));
    }
    self.format.format(date, next)
  }
}

/// Editor operations that need the catalog or the number generator.
pub struct InvoiceService {
  catalog: Arc<dyn CatalogRepository>,
  numbers: Arc<dyn InvoiceNumberGenerator>,
  calculator: TotalsCalculator,
}

impl InvoiceService {
  pub fn new(
    catalog: Arc<dyn CatalogRepository>,
    numbers: Arc<dyn InvoiceNumberGenerator>,
    calculator: TotalsCalculator,
  ) -> Self {
    Self {
      catalog,
      numbers,
      calculator,
    }
  }

  pub fn totals(&self, invoice: &Invoice) -> InvoiceTotals {
    self.calculator.calculate(invoice.items(), invoice.currency())
  }

  pub fn preview_number(&self, today: NaiveDate) -> String {
    self.numbers.preview(today)
  }

  pub async fn select_item(
    &self,
    invoice: &mut Invoice,
    line_id: Uuid,
    source: LineItemSource,
  ) -> Result<InvoiceItem, InvoiceError> {
    let selected = match source {
      LineItemSource::Catalog(item_id) => {
        let item = self
          .catalog
          .find_item(item_id)
          .await?
          .ok_or(CatalogError::ItemNotFound(item_id))?;
        invoice.select_item(line_id, ItemSelection::Catalog(&item))?
      }
      LineItemSource::Custom => invoice.select_item(line_id, ItemSelection::Custom)?,
      LineItemSource::Unselected => invoice.select_item(line_id, ItemSelection::Unselected)?,
    };
    Ok(selected.clone())
  }

  pub async fn set_header(
    &self,
    invoice: &mut Invoice,
    date: NaiveDate,
    client_id: Option<Uuid>,
    delivery_route_id: Option<Uuid>,
  ) -> Result<(), InvoiceError> {
    if let Some(id) = client_id {
      self
        .catalog
        .find_client(id)
        .await?
        .ok_or(CatalogError::ClientNotFound(id))?;
    }
    if let Some(id) = delivery_route_id {
      self
        .catalog
        .find_delivery_route(id)
        .await?
        .ok_or(CatalogError::DeliveryRouteNotFound(id))?;
    }

    if invoice.date() != date {
      invoice.set_date(date);
    }
    if invoice.client_id() != client_id {
      invoice.set_client(client_id);
    }
    if invoice.delivery_route_id() != delivery_route_id {
      invoice.set_delivery_route(delivery_route_id);
    }
    Ok(())
  }

  pub async fn update_payment(
    &self,
    invoice: &mut Invoice,
    index: usize,
    patch: PaymentPatch,
  ) -> Result<Payment, InvoiceError> {
    let keeps_bank_transfer = invoice
      .payments()
      .get(index)
      .map(|payment| patch.method.unwrap_or(payment.method).is_bank_transfer())
      .unwrap_or(false);
    if let (Some(Some(account_id)), true) = (patch.bank_account_id, keeps_bank_transfer) {
      self
        .catalog
        .find_bank_account(account_id)
        .await?
        .ok_or(CatalogError::BankAccountNotFound(account_id))?;
    }
    Ok(invoice.update_payment(index, patch)?.clone())
  }

  /// Computes totals, assigns a number and snapshots the bank details of the
  /// first bank transfer payment whose account still exists.
  pub async fn generate(
    &self,
    invoice: &mut Invoice,
    today: NaiveDate,
  ) -> Result<Finalization, InvoiceError> {
    let totals = self.totals(invoice);

    let account_ids: Vec<Uuid> = invoice.bank_transfer_account_ids().collect();
    let mut bank_details = None;
    for account_id in account_ids {
      match self.catalog.find_bank_account(account_id).await? {
        Some(account) => {
          bank_details = Some(BankDetails::snapshot_of(&account));
          break;
        }
        None => {
          tracing::warn!(%account_id, "Skipping unknown bank account on payment");
        }
      }
    }

    let number = self.numbers.next_number(today)?;
    let finalization = Finalization {
      number,
      totals,
      bank_details,
      generated_on: today,
    };
    invoice.finalize(finalization.clone());

    tracing::info!(
      invoice_number = %finalization.number,
      total = %finalization.totals.total.amount,
      "Invoice generated"
    );
    Ok(finalization)
  }

  /// Resolves client and route from the catalog and builds the print view.
  pub async fn document(
    &self,
    invoice: &Invoice,
    issuer: &IssuerProfile,
  ) -> Result<InvoiceDocument, InvoiceError> {
    if invoice.finalization().is_none() {
      return Err(InvoiceError::NotFinalized);
    }

    let client: Option<Client> = match invoice.client_id() {
      Some(id) => self.catalog.find_client(id).await?,
      None => None,
    };
    let route: Option<DeliveryRoute> = match invoice.delivery_route_id() {
      Some(id) => self.catalog.find_delivery_route(id).await?,
      None => None,
    };

    InvoiceDocument::build(invoice, client.as_ref(), route.as_ref(), issuer)
  }
}
