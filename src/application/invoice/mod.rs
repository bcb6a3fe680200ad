pub mod draft_session;
pub mod edit_line_items;
pub mod edit_payments;
pub mod export_invoice;
pub mod generate_invoice;
pub mod get_draft;
pub mod list_catalog;
pub mod render_invoice;
pub mod update_invoice_header;

pub use draft_session::DraftSession;
pub use edit_line_items::{
  AddLineItemUseCase, RemoveLineItemCommand, RemoveLineItemUseCase, SelectLineItemCommand,
  SelectLineItemUseCase, UpdateLineItemCommand, UpdateLineItemUseCase,
};
pub use edit_payments::{
  AddPaymentUseCase, RemovePaymentCommand, RemovePaymentUseCase, UpdatePaymentCommand,
  UpdatePaymentUseCase,
};
pub use export_invoice::ExportInvoiceUseCase;
pub use generate_invoice::{GenerateInvoiceResponse, GenerateInvoiceUseCase};
pub use get_draft::{
  BankDetailsDto, DraftResponse, FinalizationDto, GetDraftUseCase, LineItemDto, PaymentDto,
  ResetDraftUseCase, TotalsDto,
};
pub use list_catalog::{CatalogResponse, ListCatalogUseCase};
pub use render_invoice::{RenderInvoiceUseCase, RenderedInvoice};
pub use update_invoice_header::{UpdateInvoiceHeaderCommand, UpdateInvoiceHeaderUseCase};

#[cfg(test)]
pub(crate) mod test_support {
  use rust_decimal_macros::dec;
  use std::sync::Arc;

  use super::DraftSession;
  use crate::domain::invoice::{
    Currency, InvoiceService, NumberFormat, RandomSequenceGenerator, TaxRate, TotalsCalculator,
  };
  use crate::infrastructure::persistence::memory::InMemoryCatalogRepository;

  pub fn demo_service() -> (Arc<InvoiceService>, Arc<InMemoryCatalogRepository>) {
    let catalog = Arc::new(InMemoryCatalogRepository::with_demo_data().unwrap());
    let service = InvoiceService::new(
      catalog.clone(),
      Arc::new(RandomSequenceGenerator::new(NumberFormat::default())),
      TotalsCalculator::new(TaxRate::new(dec!(0.20)).unwrap()),
    );
    (Arc::new(service), catalog)
  }

  pub fn demo_session() -> Arc<DraftSession> {
    Arc::new(DraftSession::new(Currency::EUR))
  }
}
