use serde::Serialize;
use std::sync::Arc;

use super::draft_session::{DraftSession, today};
use super::get_draft::{BankDetailsDto, TotalsDto};
use crate::domain::invoice::{InvoiceError, InvoiceService};

#[derive(Debug, Clone, Serialize)]
pub struct GenerateInvoiceResponse {
  pub invoice_number: String,
  pub totals: TotalsDto,
  pub bank_details: Option<BankDetailsDto>,
}

pub struct GenerateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
  session: Arc<DraftSession>,
}

impl GenerateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>, session: Arc<DraftSession>) -> Self {
    Self {
      invoice_service,
      session,
    }
  }

  pub async fn execute(&self) -> Result<GenerateInvoiceResponse, InvoiceError> {
    let mut draft = self.session.write().await;
    let finalization = self.invoice_service.generate(&mut draft, today()).await?;

    Ok(GenerateInvoiceResponse {
      invoice_number: finalization.number.to_string(),
      totals: TotalsDto::from(&finalization.totals),
      bank_details: finalization.bank_details.as_ref().map(BankDetailsDto::from),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::invoice::edit_line_items::{
    AddLineItemUseCase, UpdateLineItemCommand, UpdateLineItemUseCase,
  };
  use crate::application::invoice::get_draft::GetDraftUseCase;
  use crate::application::invoice::test_support::{demo_service, demo_session};
  use chrono::Datelike;
  use regex::Regex;

  #[tokio::test]
  async fn test_generate_computes_totals_and_number() {
    let (service, _) = demo_service();
    let session = demo_session();
    let item = AddLineItemUseCase::new(session.clone()).execute().await.unwrap();
    UpdateLineItemUseCase::new(service.clone(), session.clone())
      .execute(UpdateLineItemCommand {
        item_id: item.id,
        quantity: Some("2".to_string()),
        unit_price: Some("100".to_string()),
        custom_name: None,
      })
      .await
      .unwrap();

    let generate = GenerateInvoiceUseCase::new(service.clone(), session.clone());
    let first = generate.execute().await.unwrap();
    let second = generate.execute().await.unwrap();

    let now = today();
    let pattern = Regex::new(&format!(r"^FAC{:02}{:04}RT\d{{3}}$", now.month(), now.year())).unwrap();
    assert!(pattern.is_match(&first.invoice_number));
    assert!(pattern.is_match(&second.invoice_number));
    assert_ne!(first.invoice_number, second.invoice_number);
    assert_eq!(second.totals.subtotal_formatted, "200.00€");
    assert_eq!(second.totals.tax_formatted, "40.00€");
    assert_eq!(second.totals.total_formatted, "240.00€");
    assert!(second.bank_details.is_none());

    let draft = GetDraftUseCase::new(service, session).execute().await.unwrap();
    assert_eq!(draft.status, "finalized");
    assert_eq!(
      draft.finalization.map(|f| f.invoice_number),
      Some(second.invoice_number)
    );
  }

  #[tokio::test]
  async fn test_edit_after_generate_returns_to_draft() {
    let (service, _) = demo_service();
    let session = demo_session();
    GenerateInvoiceUseCase::new(service.clone(), session.clone())
      .execute()
      .await
      .unwrap();

    AddLineItemUseCase::new(session.clone()).execute().await.unwrap();

    let draft = GetDraftUseCase::new(service, session).execute().await.unwrap();
    assert_eq!(draft.status, "draft");
    assert!(draft.finalization.is_none());
  }
}
