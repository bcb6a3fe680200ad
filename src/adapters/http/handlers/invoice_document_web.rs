use actix_web::{
  HttpRequest, HttpResponse,
  http::header::{ContentDisposition, DispositionParam, DispositionType},
  web,
};
use std::sync::Arc;

use crate::adapters::http::errors::ApiError;
use crate::application::invoice::{
  ExportInvoiceUseCase, GenerateInvoiceUseCase, GetDraftUseCase, RenderInvoiceUseCase,
};

const PREVIEW_PATH: &str = "/invoices/draft/preview";

// POST /invoices/draft/generate - Assign number, freeze totals and bank details
pub async fn generate_invoice(
  req: HttpRequest,
  generate_use_case: web::Data<Arc<GenerateInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = generate_use_case.execute().await?;

  if req.headers().contains_key("HX-Request") {
    return Ok(
      HttpResponse::Ok()
        .insert_header(("HX-Redirect", PREVIEW_PATH))
        .finish(),
    );
  }
  Ok(HttpResponse::Ok().json(response))
}

// GET /invoices/draft/preview - Printable document
pub async fn invoice_preview_page(
  render_use_case: web::Data<Arc<RenderInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let rendered = render_use_case.execute().await?;

  Ok(
    HttpResponse::Ok()
      .content_type("text/html; charset=utf-8")
      .body(rendered.html),
  )
}

// GET /invoices/draft/export - Paginated PDF download
pub async fn export_invoice_pdf(
  export_use_case: web::Data<Arc<ExportInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let document = export_use_case.execute().await?;

  Ok(
    HttpResponse::Ok()
      .content_type(document.content_type)
      .insert_header(ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(document.filename)],
      })
      .insert_header(("X-Page-Count", document.page_count.to_string()))
      .body(document.bytes),
  )
}

// GET /api/v1/invoices/draft - Draft snapshot with computed totals
pub async fn get_draft_json(
  get_draft_use_case: web::Data<Arc<GetDraftUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let draft = get_draft_use_case.execute().await?;
  Ok(HttpResponse::Ok().json(draft))
}
