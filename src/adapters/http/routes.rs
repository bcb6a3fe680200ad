use actix_web::{HttpResponse, web};
use std::sync::Arc;

use crate::application::invoice::{
  AddLineItemUseCase, AddPaymentUseCase, DraftSession, ExportInvoiceUseCase,
  GenerateInvoiceUseCase, GetDraftUseCase, ListCatalogUseCase, RemoveLineItemUseCase,
  RemovePaymentUseCase, RenderInvoiceUseCase, ResetDraftUseCase, SelectLineItemUseCase,
  UpdateInvoiceHeaderUseCase, UpdateLineItemUseCase, UpdatePaymentUseCase,
};
use crate::domain::catalog::CatalogRepository;
use crate::domain::export::{DocumentAssembler, PageLayout, PageRasterizer};
use crate::domain::invoice::{InvoiceService, IssuerProfile};
use crate::infrastructure::templates::TemplateEngine;

use super::handlers::{invoice_document_web, invoice_editor_web};

/// Everything the invoice editor routes need
#[derive(Clone)]
pub struct InvoiceEditorDependencies {
  pub templates: TemplateEngine,
  pub get_draft_use_case: Arc<GetDraftUseCase>,
  pub reset_draft_use_case: Arc<ResetDraftUseCase>,
  pub list_catalog_use_case: Arc<ListCatalogUseCase>,
  pub update_header_use_case: Arc<UpdateInvoiceHeaderUseCase>,
  pub add_item_use_case: Arc<AddLineItemUseCase>,
  pub update_item_use_case: Arc<UpdateLineItemUseCase>,
  pub select_item_use_case: Arc<SelectLineItemUseCase>,
  pub remove_item_use_case: Arc<RemoveLineItemUseCase>,
  pub add_payment_use_case: Arc<AddPaymentUseCase>,
  pub update_payment_use_case: Arc<UpdatePaymentUseCase>,
  pub remove_payment_use_case: Arc<RemovePaymentUseCase>,
  pub generate_use_case: Arc<GenerateInvoiceUseCase>,
  pub render_use_case: Arc<RenderInvoiceUseCase>,
  pub export_use_case: Arc<ExportInvoiceUseCase>,
}

impl InvoiceEditorDependencies {
  /// Builds every use case around one shared draft session
  #[allow(clippy::too_many_arguments)]
  pub fn new(
    templates: TemplateEngine,
    invoice_service: Arc<InvoiceService>,
    catalog: Arc<dyn CatalogRepository>,
    session: Arc<DraftSession>,
    issuer: IssuerProfile,
    rasterizer: Arc<dyn PageRasterizer>,
    assembler: Arc<dyn DocumentAssembler>,
    layout: PageLayout,
  ) -> Self {
    let render_use_case = Arc::new(RenderInvoiceUseCase::new(
      invoice_service.clone(),
      session.clone(),
      Arc::new(templates.clone()),
      issuer,
    ));
    let export_use_case = Arc::new(ExportInvoiceUseCase::new(
      session.clone(),
      render_use_case.clone(),
      rasterizer,
      assembler,
      layout,
    ));

    Self {
      templates,
      get_draft_use_case: Arc::new(GetDraftUseCase::new(invoice_service.clone(), session.clone())),
      reset_draft_use_case: Arc::new(ResetDraftUseCase::new(
        invoice_service.clone(),
        session.clone(),
      )),
      list_catalog_use_case: Arc::new(ListCatalogUseCase::new(catalog)),
      update_header_use_case: Arc::new(UpdateInvoiceHeaderUseCase::new(
        invoice_service.clone(),
        session.clone(),
      )),
      add_item_use_case: Arc::new(AddLineItemUseCase::new(session.clone())),
      update_item_use_case: Arc::new(UpdateLineItemUseCase::new(
        invoice_service.clone(),
        session.clone(),
      )),
      select_item_use_case: Arc::new(SelectLineItemUseCase::new(
        invoice_service.clone(),
        session.clone(),
      )),
      remove_item_use_case: Arc::new(RemoveLineItemUseCase::new(
        invoice_service.clone(),
        session.clone(),
      )),
      add_payment_use_case: Arc::new(AddPaymentUseCase::new(session.clone())),
      update_payment_use_case: Arc::new(UpdatePaymentUseCase::new(
        invoice_service.clone(),
        session.clone(),
      )),
      remove_payment_use_case: Arc::new(RemovePaymentUseCase::new(
        invoice_service.clone(),
        session.clone(),
      )),
      generate_use_case: Arc::new(GenerateInvoiceUseCase::new(invoice_service, session)),
      render_use_case,
      export_use_case,
    }
  }
}

/// Configure the invoice editor
///
/// # Routes
///
/// - GET /health - Liveness probe
/// - GET / - Redirect to the editor
/// - GET /invoices/new - Editor page
/// - POST /invoices/new/reset - Start a fresh draft
/// - POST /invoices/draft/header - Date, client, delivery route
/// - POST /invoices/draft/items - Add line item
/// - POST /invoices/draft/items/{id} - Update line item
/// - POST /invoices/draft/items/{id}/selection - Choose catalog item or custom
/// - DELETE /invoices/draft/items/{id} - Remove line item
/// - POST /invoices/draft/payments - Add payment
/// - POST /invoices/draft/payments/{index} - Update payment
/// - DELETE /invoices/draft/payments/{index} - Remove payment
/// - POST /invoices/draft/generate - Finalize the draft
/// - GET /invoices/draft/preview - Rendered document
/// - GET /invoices/draft/export - PDF download
/// - GET /api/v1/invoices/draft - JSON snapshot
pub fn configure_invoice_editor_routes(
  cfg: &mut web::ServiceConfig,
  deps: InvoiceEditorDependencies,
) {
  cfg
    .app_data(web::Data::new(deps.templates))
    .app_data(web::Data::new(deps.get_draft_use_case))
    .app_data(web::Data::new(deps.reset_draft_use_case))
    .app_data(web::Data::new(deps.list_catalog_use_case))
    .app_data(web::Data::new(deps.update_header_use_case))
    .app_data(web::Data::new(deps.add_item_use_case))
    .app_data(web::Data::new(deps.update_item_use_case))
    .app_data(web::Data::new(deps.select_item_use_case))
    .app_data(web::Data::new(deps.remove_item_use_case))
    .app_data(web::Data::new(deps.add_payment_use_case))
    .app_data(web::Data::new(deps.update_payment_use_case))
    .app_data(web::Data::new(deps.remove_payment_use_case))
    .app_data(web::Data::new(deps.generate_use_case))
    .app_data(web::Data::new(deps.render_use_case))
    .app_data(web::Data::new(deps.export_use_case));

  cfg
    .route("/health", web::get().to(health_check))
    .route(
      "/",
      web::get().to(|| async {
        HttpResponse::Found()
          .insert_header(("Location", "/invoices/new"))
          .finish()
      }),
    )
    .route(
      "/invoices/new",
      web::get().to(invoice_editor_web::invoice_editor_page),
    )
    .route(
      "/invoices/new/reset",
      web::post().to(invoice_editor_web::reset_draft),
    );

  cfg.service(
    web::scope("/invoices/draft")
      .route("/header", web::post().to(invoice_editor_web::update_header))
      .route("/items", web::post().to(invoice_editor_web::add_line_item))
      .route(
        "/items/{id}",
        web::post().to(invoice_editor_web::update_line_item),
      )
      .route(
        "/items/{id}",
        web::delete().to(invoice_editor_web::remove_line_item),
      )
      .route(
        "/items/{id}/selection",
        web::post().to(invoice_editor_web::select_line_item),
      )
      .route("/payments", web::post().to(invoice_editor_web::add_payment))
      .route(
        "/payments/{index}",
        web::post().to(invoice_editor_web::update_payment),
      )
      .route(
        "/payments/{index}",
        web::delete().to(invoice_editor_web::remove_payment),
      )
      .route(
        "/generate",
        web::post().to(invoice_document_web::generate_invoice),
      )
      .route(
        "/preview",
        web::get().to(invoice_document_web::invoice_preview_page),
      )
      .route(
        "/export",
        web::get().to(invoice_document_web::export_invoice_pdf),
      ),
  );

  cfg.route(
    "/api/v1/invoices/draft",
    web::get().to(invoice_document_web::get_draft_json),
  );
}

/// Health check endpoint
async fn health_check() -> &'static str {
  "OK"
}
