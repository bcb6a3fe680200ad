use async_trait::async_trait;

use super::errors::ExportError;
use super::layout::PageLayout;

/// Captures rendered HTML as an encoded raster image (PNG).
#[async_trait]
pub trait PageRasterizer: Send + Sync {
  async fn rasterize(&self, html: &str) -> Result<Vec<u8>, ExportError>;
}

#[derive(Debug, Clone)]
pub struct AssembledDocument {
  pub bytes: Vec<u8>,
  pub page_count: u32,
}

/// Tiles a raster image over fixed-size pages and stamps page numbers.
pub trait DocumentAssembler: Send + Sync {
  fn assemble(
    &self,
    title: &str,
    raster: &[u8],
    layout: &PageLayout,
  ) -> Result<AssembledDocument, ExportError>;
}
