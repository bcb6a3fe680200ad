pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod routes;

// Re-export commonly used types
pub use dtos::{ErrorResponse, HeaderForm, LineItemForm, PaymentForm, SelectionForm};
pub use errors::ApiError;
pub use routes::{InvoiceEditorDependencies, configure_invoice_editor_routes};
