use thiserror::Error;

use crate::domain::invoice::errors::InvoiceError;

#[derive(Debug, Error)]
pub enum ExportError {
  #[error("Nothing to export: {0}")]
  NothingToExport(String),

  #[error("Rasterization failed: {0}")]
  RasterizationFailed(String),

  #[error("PDF assembly failed: {0}")]
  PdfAssemblyFailed(String),

  #[error("Rasterization timed out after {0} seconds")]
  Timeout(u64),

  #[error(transparent)]
  Invoice(InvoiceError),
}

impl From<InvoiceError> for ExportError {
  fn from(err: InvoiceError) -> Self {
    match err {
      InvoiceError::NotFinalized => {
        ExportError::NothingToExport("invoice has not been generated".to_string())
      }
      other => ExportError::Invoice(other),
    }
  }
}
