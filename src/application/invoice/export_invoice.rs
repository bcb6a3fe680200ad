use std::sync::Arc;
use std::time::Instant;

use super::draft_session::DraftSession;
use super::render_invoice::RenderInvoiceUseCase;
use crate::domain::export::{
  DocumentAssembler, ExportError, ExportedDocument, PDF_CONTENT_TYPE, PageLayout, PageRasterizer,
  export_filename,
};

/// Rasterizes the rendered invoice and tiles it into a paginated PDF.
pub struct ExportInvoiceUseCase {
  session: Arc<DraftSession>,
  render: Arc<RenderInvoiceUseCase>,
  rasterizer: Arc<dyn PageRasterizer>,
  assembler: Arc<dyn DocumentAssembler>,
  layout: PageLayout,
}

impl ExportInvoiceUseCase {
  pub fn new(
    session: Arc<DraftSession>,
    render: Arc<RenderInvoiceUseCase>,
    rasterizer: Arc<dyn PageRasterizer>,
    assembler: Arc<dyn DocumentAssembler>,
    layout: PageLayout,
  ) -> Self {
    Self {
      session,
      render,
      rasterizer,
      assembler,
      layout,
    }
  }

  pub async fn execute(&self) -> Result<ExportedDocument, ExportError> {
    // Work on a copy so edits are not blocked while the rasterizer runs
    let invoice = self.session.snapshot().await;
    let number = invoice
      .finalization()
      .map(|f| f.number.clone())
      .ok_or_else(|| ExportError::NothingToExport("invoice has not been generated".to_string()))?;

    let rendered = self.render.render(&invoice).await?;
    if rendered.html.trim().is_empty() {
      return Err(ExportError::NothingToExport(
        "rendered document is empty".to_string(),
      ));
    }

    let started = Instant::now();
    let raster = self.rasterizer.rasterize(&rendered.html).await?;
    if raster.is_empty() {
      return Err(ExportError::NothingToExport(
        "rasterizer produced no image".to_string(),
      ));
    }

    let title = format!("Invoice {}", number);
    let assembled = self.assembler.assemble(&title, &raster, &self.layout)?;

    tracing::info!(
      invoice_number = %number,
      pages = assembled.page_count,
      bytes = assembled.bytes.len(),
      elapsed_ms = started.elapsed().as_millis() as u64,
      "Invoice exported"
    );

    Ok(ExportedDocument {
      filename: export_filename(Some(&number)),
      content_type: PDF_CONTENT_TYPE,
      bytes: assembled.bytes,
      page_count: assembled.page_count,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::invoice::test_support::{demo_service, demo_session};
  use crate::domain::export::AssembledDocument;
  use crate::domain::invoice::{DocumentRenderer, InvoiceDocument, InvoiceError, IssuerProfile};
  use async_trait::async_trait;
  use std::sync::atomic::{AtomicUsize, Ordering};

  struct NumberRenderer;

  impl DocumentRenderer for NumberRenderer {
    fn render_invoice(&self, document: &InvoiceDocument) -> Result<String, InvoiceError> {
      Ok(format!("<h1>{}</h1>", document.number))
    }
  }

  #[derive(Default)]
  struct CountingRasterizer {
    calls: AtomicUsize,
  }

  #[async_trait]
  impl PageRasterizer for CountingRasterizer {
    async fn rasterize(&self, html: &str) -> Result<Vec<u8>, ExportError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      Ok(html.as_bytes().to_vec())
    }
  }

  struct EchoAssembler;

  impl DocumentAssembler for EchoAssembler {
    fn assemble(
      &self,
      title: &str,
      raster: &[u8],
      _layout: &PageLayout,
    ) -> Result<AssembledDocument, ExportError> {
      let mut bytes = title.as_bytes().to_vec();
      bytes.extend_from_slice(raster);
      Ok(AssembledDocument {
        bytes,
        page_count: 1,
      })
    }
  }

  fn use_case(
    session: Arc<DraftSession>,
    rasterizer: Arc<CountingRasterizer>,
  ) -> ExportInvoiceUseCase {
    let (service, _) = demo_service();
    let render = Arc::new(RenderInvoiceUseCase::new(
      service,
      session.clone(),
      Arc::new(NumberRenderer),
      IssuerProfile::default(),
    ));
    ExportInvoiceUseCase::new(
      session,
      render,
      rasterizer,
      Arc::new(EchoAssembler),
      PageLayout::a4(),
    )
  }

  #[tokio::test]
  async fn test_draft_export_is_nothing_to_export() {
    let rasterizer = Arc::new(CountingRasterizer::default());
    let result = use_case(demo_session(), rasterizer.clone()).execute().await;

    assert!(matches!(result, Err(ExportError::NothingToExport(_))));
    assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn test_export_names_file_after_number() {
    let session = demo_session();
    let (service, _) = demo_service();
    let number = {
      let mut draft = session.write().await;
      let today = draft.date();
      service.generate(&mut draft, today).await.unwrap().number
    };
    let rasterizer = Arc::new(CountingRasterizer::default());

    let exported = use_case(session, rasterizer.clone()).execute().await.unwrap();

    assert_eq!(exported.filename, format!("invoice_{}.pdf", number));
    assert_eq!(exported.content_type, "application/pdf");
    assert_eq!(exported.page_count, 1);
    assert!(String::from_utf8(exported.bytes).unwrap().contains(number.value()));
    assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 1);
  }
}
