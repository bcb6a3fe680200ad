pub mod invoice_document_web;
pub mod invoice_editor_web;
