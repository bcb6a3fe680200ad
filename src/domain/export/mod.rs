pub mod errors;
pub mod layout;
pub mod ports;

pub use errors::ExportError;
pub use layout::{
  ExportedDocument, PDF_CONTENT_TYPE, PageLayout, PageSlice, Pagination, export_filename,
  page_label,
};
pub use ports::{AssembledDocument, DocumentAssembler, PageRasterizer};
