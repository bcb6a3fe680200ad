pub mod paginated_pdf_assembler;
pub mod wkhtmltoimage_rasterizer;

pub use paginated_pdf_assembler::PaginatedPdfAssembler;
pub use wkhtmltoimage_rasterizer::WkHtmlToImageRasterizer;
