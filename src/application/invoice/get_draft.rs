use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::draft_session::{DraftSession, today};
use crate::domain::invoice::{
  BankDetails, Finalization, Invoice, InvoiceError, InvoiceItem, InvoiceService, InvoiceTotals,
  Payment,
};

#[derive(Debug, Clone, Serialize)]
pub struct LineItemDto {
  pub id: Uuid,
  /// Value of the item dropdown: empty, `custom`, or a catalog item id
  pub selection: String,
  pub is_custom: bool,
  pub display_name: Option<String>,
  pub custom_name: Option<String>,
  pub quantity: u32,
  pub unit_price: Decimal,
  pub total: Decimal,
  pub total_formatted: String,
}

impl From<&InvoiceItem> for LineItemDto {
  fn from(item: &InvoiceItem) -> Self {
    let total = item.total();
    Self {
      id: item.id,
      selection: item.source.as_form_value(),
      is_custom: item.source.is_custom(),
      display_name: item.display_name().map(str::to_string),
      custom_name: item.custom_name.clone(),
      quantity: item.quantity.value(),
      unit_price: item.unit_price.amount,
      total: total.amount,
      total_formatted: total.format_suffixed(),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentDto {
  pub index: usize,
  pub method: String,
  pub method_label: String,
  pub amount: Decimal,
  pub due_date: NaiveDate,
  pub bank_account_id: Option<Uuid>,
}

impl PaymentDto {
  pub fn from_payment(index: usize, payment: &Payment) -> Self {
    Self {
      index,
      method: payment.method.as_str().to_string(),
      method_label: payment.method.label().to_string(),
      amount: payment.amount.amount,
      due_date: payment.due_date,
      bank_account_id: payment.bank_account_id,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalsDto {
  pub subtotal: Decimal,
  pub tax: Decimal,
  pub total: Decimal,
  pub tax_rate_percent: String,
  pub currency: String,
  pub subtotal_formatted: String,
  pub tax_formatted: String,
  pub total_formatted: String,
}

impl From<&InvoiceTotals> for TotalsDto {
  fn from(totals: &InvoiceTotals) -> Self {
    Self {
      subtotal: totals.subtotal.amount,
      tax: totals.tax.amount,
      total: totals.total.amount,
      tax_rate_percent: totals.tax_rate.format_percent(),
      currency: totals.subtotal.currency.as_str().to_string(),
      subtotal_formatted: totals.subtotal.format_suffixed(),
      tax_formatted: totals.tax.format_suffixed(),
      total_formatted: totals.total.format_suffixed(),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct BankDetailsDto {
  pub account_id: Uuid,
  pub name: String,
  pub iban: String,
  pub iban_formatted: String,
  pub bic: String,
}

impl From<&BankDetails> for BankDetailsDto {
  fn from(details: &BankDetails) -> Self {
    Self {
      account_id: details.account_id,
      name: details.name.clone(),
      iban: details.iban.clone(),
      iban_formatted: details.iban_formatted.clone(),
      bic: details.bic.clone(),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct FinalizationDto {
  pub invoice_number: String,
  pub totals: TotalsDto,
  pub bank_details: Option<BankDetailsDto>,
  pub generated_on: NaiveDate,
}

impl From<&Finalization> for FinalizationDto {
  fn from(finalization: &Finalization) -> Self {
    Self {
      invoice_number: finalization.number.to_string(),
      totals: TotalsDto::from(&finalization.totals),
      bank_details: finalization.bank_details.as_ref().map(BankDetailsDto::from),
      generated_on: finalization.generated_on,
    }
  }
}

/// Editor view of the draft: lines, payments, live totals and generation state.
#[derive(Debug, Clone, Serialize)]
pub struct DraftResponse {
  pub id: Uuid,
  pub status: String,
  pub date: NaiveDate,
  pub client_id: Option<Uuid>,
  pub delivery_route_id: Option<Uuid>,
  pub currency: String,
  pub items: Vec<LineItemDto>,
  pub payments: Vec<PaymentDto>,
  pub totals: TotalsDto,
  pub finalization: Option<FinalizationDto>,
  pub number_preview: String,
  pub updated_at: DateTime<Utc>,
}

impl DraftResponse {
  pub fn build(invoice: &Invoice, service: &InvoiceService) -> Self {
    Self {
      id: invoice.id(),
      status: invoice.status().as_str().to_string(),
      date: invoice.date(),
      client_id: invoice.client_id(),
      delivery_route_id: invoice.delivery_route_id(),
      currency: invoice.currency().as_str().to_string(),
      items: invoice.items().iter().map(LineItemDto::from).collect(),
      payments: invoice
        .payments()
        .iter()
        .enumerate()
        .map(|(index, payment)| PaymentDto::from_payment(index, payment))
        .collect(),
      totals: TotalsDto::from(&service.totals(invoice)),
      finalization: invoice.finalization().map(FinalizationDto::from),
      number_preview: service.preview_number(today()),
      updated_at: invoice.updated_at(),
    }
  }
}

pub struct GetDraftUseCase {
  invoice_service: Arc<InvoiceService>,
  session: Arc<DraftSession>,
}

impl GetDraftUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>, session: Arc<DraftSession>) -> Self {
    Self {
      invoice_service,
      session,
    }
  }

  pub async fn execute(&self) -> Result<DraftResponse, InvoiceError> {
    let draft = self.session.read().await;
    Ok(DraftResponse::build(&draft, &self.invoice_service))
  }
}

pub struct ResetDraftUseCase {
  invoice_service: Arc<InvoiceService>,
  session: Arc<DraftSession>,
}

impl ResetDraftUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>, session: Arc<DraftSession>) -> Self {
    Self {
      invoice_service,
      session,
    }
  }

  pub async fn execute(&self) -> Result<DraftResponse, InvoiceError> {
    let fresh = self.session.reset().await;
    tracing::info!(draft_id = %fresh.id(), "Started a new invoice draft");
    Ok(DraftResponse::build(&fresh, &self.invoice_service))
  }
}
