use serde::Serialize;
use std::sync::Arc;

use super::draft_session::DraftSession;
use crate::domain::invoice::{
  DocumentRenderer, Invoice, InvoiceError, InvoiceService, IssuerProfile,
};

#[derive(Debug, Clone, Serialize)]
pub struct RenderedInvoice {
  pub invoice_number: String,
  pub html: String,
}

/// Renders the generated draft as a printable HTML document.
pub struct RenderInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
  session: Arc<DraftSession>,
  renderer: Arc<dyn DocumentRenderer>,
  issuer: IssuerProfile,
}

impl RenderInvoiceUseCase {
  pub fn new(
    invoice_service: Arc<InvoiceService>,
    session: Arc<DraftSession>,
    renderer: Arc<dyn DocumentRenderer>,
    issuer: IssuerProfile,
  ) -> Self {
    Self {
      invoice_service,
      session,
      renderer,
      issuer,
    }
  }

  pub async fn execute(&self) -> Result<RenderedInvoice, InvoiceError> {
    let invoice = self.session.snapshot().await;
    self.render(&invoice).await
  }

  pub async fn render(&self, invoice: &Invoice) -> Result<RenderedInvoice, InvoiceError> {
    let document = self.invoice_service.document(invoice, &self.issuer).await?;
    let html = self.renderer.render_invoice(&document)?;
    Ok(RenderedInvoice {
      invoice_number: document.number,
      html,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::invoice::test_support::{demo_service, demo_session};
  use crate::domain::invoice::InvoiceDocument;

  struct SummaryRenderer;

  impl DocumentRenderer for SummaryRenderer {
    fn render_invoice(&self, document: &InvoiceDocument) -> Result<String, InvoiceError> {
      Ok(format!(
        "{} {} {}",
        document.number, document.totals.total, document.payment_terms.due_date
      ))
    }
  }

  #[tokio::test]
  async fn test_draft_is_not_rendered() {
    let (service, _) = demo_service();
    let use_case = RenderInvoiceUseCase::new(
      service,
      demo_session(),
      Arc::new(SummaryRenderer),
      IssuerProfile::default(),
    );
    assert!(matches!(
      use_case.execute().await,
      Err(InvoiceError::NotFinalized)
    ));
  }

  #[tokio::test]
  async fn test_renders_generated_invoice() {
    let (service, _) = demo_service();
    let session = demo_session();
    let number = {
      let mut draft = session.write().await;
      let today = draft.date();
      service.generate(&mut draft, today).await.unwrap().number
    };

    let rendered = RenderInvoiceUseCase::new(
      service,
      session,
      Arc::new(SummaryRenderer),
      IssuerProfile::default(),
    )
    .execute()
    .await
    .unwrap();

    assert_eq!(rendered.invoice_number, number.value());
    assert_eq!(rendered.html, format!("{} 0.00€ N/A", number));
  }
}
