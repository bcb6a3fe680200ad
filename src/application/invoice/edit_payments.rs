use chrono::NaiveDate;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::draft_session::{DraftSession, today};
use super::get_draft::{DraftResponse, PaymentDto};
use crate::domain::invoice::{
  InvoiceError, InvoiceService, Money, PaymentMethod, PaymentPatch, ValueObjectError,
};

pub struct AddPaymentUseCase {
  session: Arc<DraftSession>,
}

impl AddPaymentUseCase {
  pub fn new(session: Arc<DraftSession>) -> Self {
    Self { session }
  }

  /// Appends a bank transfer of 0 due today.
  pub async fn execute(&self) -> Result<PaymentDto, InvoiceError> {
    let mut draft = self.session.write().await;
    let index = draft.add_payment(today());
    let payment = &draft.payments()[index];
    Ok(PaymentDto::from_payment(index, payment))
  }
}

#[derive(Debug, Deserialize)]
pub struct RemovePaymentCommand {
  pub index: usize,
}

pub struct RemovePaymentUseCase {
  invoice_service: Arc<InvoiceService>,
  session: Arc<DraftSession>,
}

impl RemovePaymentUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>, session: Arc<DraftSession>) -> Self {
    Self {
      invoice_service,
      session,
    }
  }

  pub async fn execute(&self, command: RemovePaymentCommand) -> Result<DraftResponse, InvoiceError> {
    let mut draft = self.session.write().await;
    if !draft.remove_payment(command.index) {
      tracing::debug!(index = command.index, "Remove ignored, no payment at position");
    }
    Ok(DraftResponse::build(&draft, &self.invoice_service))
  }
}

/// Raw form values; `None` leaves the field as it is. An empty
/// `bank_account_id` clears the account.
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentCommand {
  pub index: usize,
  pub method: Option<String>,
  pub amount: Option<String>,
  pub due_date: Option<NaiveDate>,
  pub bank_account_id: Option<String>,
}

pub struct UpdatePaymentUseCase {
  invoice_service: Arc<InvoiceService>,
  session: Arc<DraftSession>,
}

impl UpdatePaymentUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>, session: Arc<DraftSession>) -> Self {
    Self {
      invoice_service,
      session,
    }
  }

  pub async fn execute(&self, command: UpdatePaymentCommand) -> Result<DraftResponse, InvoiceError> {
    let method = command
      .method
      .as_deref()
      .map(PaymentMethod::from_str)
      .transpose()?;
    let amount = command
      .amount
      .as_deref()
      .map(|raw| Money::parse(raw, self.session.currency()))
      .transpose()?;
    let bank_account_id = command
      .bank_account_id
      .as_deref()
      .map(parse_optional_id)
      .transpose()?;

    let mut draft = self.session.write().await;
    self
      .invoice_service
      .update_payment(
        &mut draft,
        command.index,
        PaymentPatch {
          method,
          amount,
          due_date: command.due_date,
          bank_account_id,
        },
      )
      .await?;
    Ok(DraftResponse::build(&draft, &self.invoice_service))
  }
}

fn parse_optional_id(raw: &str) -> Result<Option<Uuid>, ValueObjectError> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Ok(None);
  }
  Uuid::parse_str(trimmed)
    .map(Some)
    .map_err(|_| ValueObjectError::InvalidReference(format!("Unknown bank account: {}", trimmed)))
}
