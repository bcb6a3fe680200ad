use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::adapters::http::dtos::{
  HeaderForm, LineItemForm, PaymentForm, SelectionForm, parse_date, parse_reference,
};
use crate::adapters::http::errors::ApiError;
use crate::application::invoice::{
  AddLineItemUseCase, AddPaymentUseCase, DraftResponse, GetDraftUseCase, ListCatalogUseCase,
  RemoveLineItemCommand, RemoveLineItemUseCase, RemovePaymentCommand, RemovePaymentUseCase,
  ResetDraftUseCase, SelectLineItemCommand, SelectLineItemUseCase, UpdateInvoiceHeaderCommand,
  UpdateInvoiceHeaderUseCase, UpdateLineItemCommand, UpdateLineItemUseCase, UpdatePaymentCommand,
  UpdatePaymentUseCase,
};
use crate::infrastructure::templates::TemplateEngine;

const EDITOR_PAGE: &str = "pages/invoice_editor.html.tera";
const EDITOR_PARTIAL: &str = "partials/invoice_editor.html.tera";

fn is_htmx(req: &HttpRequest) -> bool {
  req.headers().contains_key("HX-Request")
}

async fn render_editor(
  template: &str,
  templates: &TemplateEngine,
  list_catalog_use_case: &ListCatalogUseCase,
  draft: &DraftResponse,
) -> Result<String, ApiError> {
  let catalog = list_catalog_use_case.execute().await?;

  let mut context = tera::Context::new();
  context.insert("draft", draft);
  context.insert("catalog", &catalog);

  templates
    .render(template, &context)
    .map_err(|e| ApiError::Internal(format!("Template error: {}", e)))
}

/// htmx requests get the re-rendered editor, everything else the JSON draft
async fn editor_response(
  req: &HttpRequest,
  templates: &TemplateEngine,
  list_catalog_use_case: &ListCatalogUseCase,
  draft: DraftResponse,
) -> Result<HttpResponse, ApiError> {
  if !is_htmx(req) {
    return Ok(HttpResponse::Ok().json(draft));
  }

  let html = render_editor(EDITOR_PARTIAL, templates, list_catalog_use_case, &draft).await?;
  Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

// GET /invoices/new - Invoice editor
pub async fn invoice_editor_page(
  templates: web::Data<TemplateEngine>,
  get_draft_use_case: web::Data<Arc<GetDraftUseCase>>,
  list_catalog_use_case: web::Data<Arc<ListCatalogUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let draft = get_draft_use_case.execute().await?;
  let html = render_editor(EDITOR_PAGE, &templates, &list_catalog_use_case, &draft).await?;

  Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

// POST /invoices/new/reset - Start over with an empty draft
pub async fn reset_draft(
  req: HttpRequest,
  reset_draft_use_case: web::Data<Arc<ResetDraftUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let draft = reset_draft_use_case.execute().await?;

  if is_htmx(&req) {
    return Ok(
      HttpResponse::Ok()
        .insert_header(("HX-Redirect", "/invoices/new"))
        .finish(),
    );
  }
  Ok(HttpResponse::Ok().json(draft))
}

// POST /invoices/draft/header - Date, client and delivery route
pub async fn update_header(
  req: HttpRequest,
  form: web::Form<HeaderForm>,
  templates: web::Data<TemplateEngine>,
  update_header_use_case: web::Data<Arc<UpdateInvoiceHeaderUseCase>>,
  list_catalog_use_case: web::Data<Arc<ListCatalogUseCase>>,
) -> Result<HttpResponse, ApiError> {
  form.validate()?;

  let draft = update_header_use_case
    .execute(UpdateInvoiceHeaderCommand {
      date: parse_date(&form.date)?,
      client_id: parse_reference(form.client_id.as_deref())?,
      delivery_route_id: parse_reference(form.delivery_route_id.as_deref())?,
    })
    .await?;

  editor_response(&req, &templates, &list_catalog_use_case, draft).await
}

// POST /invoices/draft/items - Append an empty line
pub async fn add_line_item(
  req: HttpRequest,
  templates: web::Data<TemplateEngine>,
  add_item_use_case: web::Data<Arc<AddLineItemUseCase>>,
  get_draft_use_case: web::Data<Arc<GetDraftUseCase>>,
  list_catalog_use_case: web::Data<Arc<ListCatalogUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let item = add_item_use_case.execute().await?;

  if !is_htmx(&req) {
    return Ok(HttpResponse::Created().json(item));
  }
  let draft = get_draft_use_case.execute().await?;
  editor_response(&req, &templates, &list_catalog_use_case, draft).await
}

// POST /invoices/draft/items/{id} - Quantity, unit price, custom name
pub async fn update_line_item(
  req: HttpRequest,
  path: web::Path<Uuid>,
  form: web::Form<LineItemForm>,
  templates: web::Data<TemplateEngine>,
  update_item_use_case: web::Data<Arc<UpdateLineItemUseCase>>,
  list_catalog_use_case: web::Data<Arc<ListCatalogUseCase>>,
) -> Result<HttpResponse, ApiError> {
  form.validate()?;
  let form = form.into_inner();

  let draft = update_item_use_case
    .execute(UpdateLineItemCommand {
      item_id: path.into_inner(),
      quantity: form.quantity,
      unit_price: form.unit_price,
      custom_name: form.custom_name,
    })
    .await?;

  editor_response(&req, &templates, &list_catalog_use_case, draft).await
}

// POST /invoices/draft/items/{id}/selection - Catalog item, custom or none
pub async fn select_line_item(
  req: HttpRequest,
  path: web::Path<Uuid>,
  form: web::Form<SelectionForm>,
  templates: web::Data<TemplateEngine>,
  select_item_use_case: web::Data<Arc<SelectLineItemUseCase>>,
  list_catalog_use_case: web::Data<Arc<ListCatalogUseCase>>,
) -> Result<HttpResponse, ApiError> {
  form.validate()?;

  let draft = select_item_use_case
    .execute(SelectLineItemCommand {
      item_id: path.into_inner(),
      selection: form.into_inner().selection,
    })
    .await?;

  editor_response(&req, &templates, &list_catalog_use_case, draft).await
}

// DELETE /invoices/draft/items/{id}
pub async fn remove_line_item(
  req: HttpRequest,
  path: web::Path<Uuid>,
  templates: web::Data<TemplateEngine>,
  remove_item_use_case: web::Data<Arc<RemoveLineItemUseCase>>,
  list_catalog_use_case: web::Data<Arc<ListCatalogUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let draft = remove_item_use_case
    .execute(RemoveLineItemCommand {
      item_id: path.into_inner(),
    })
    .await?;

  editor_response(&req, &templates, &list_catalog_use_case, draft).await
}

// POST /invoices/draft/payments - Append a bank transfer due today
pub async fn add_payment(
  req: HttpRequest,
  templates: web::Data<TemplateEngine>,
  add_payment_use_case: web::Data<Arc<AddPaymentUseCase>>,
  get_draft_use_case: web::Data<Arc<GetDraftUseCase>>,
  list_catalog_use_case: web::Data<Arc<ListCatalogUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let payment = add_payment_use_case.execute().await?;

  if !is_htmx(&req) {
    return Ok(HttpResponse::Created().json(payment));
  }
  let draft = get_draft_use_case.execute().await?;
  editor_response(&req, &templates, &list_catalog_use_case, draft).await
}

// POST /invoices/draft/payments/{index}
pub async fn update_payment(
  req: HttpRequest,
  path: web::Path<usize>,
  form: web::Form<PaymentForm>,
  templates: web::Data<TemplateEngine>,
  update_payment_use_case: web::Data<Arc<UpdatePaymentUseCase>>,
  list_catalog_use_case: web::Data<Arc<ListCatalogUseCase>>,
) -> Result<HttpResponse, ApiError> {
  form.validate()?;
  let form = form.into_inner();

  let due_date = match form.due_date.as_deref().map(str::trim) {
    None | Some("") => None,
    Some(raw) => Some(parse_date(raw)?),
  };

  let draft = update_payment_use_case
    .execute(UpdatePaymentCommand {
      index: path.into_inner(),
      method: form.method,
      amount: form.amount,
      due_date,
      bank_account_id: form.bank_account_id,
    })
    .await?;

  editor_response(&req, &templates, &list_catalog_use_case, draft).await
}

// DELETE /invoices/draft/payments/{index}
pub async fn remove_payment(
  req: HttpRequest,
  path: web::Path<usize>,
  templates: web::Data<TemplateEngine>,
  remove_payment_use_case: web::Data<Arc<RemovePaymentUseCase>>,
  list_catalog_use_case: web::Data<Arc<ListCatalogUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let draft = remove_payment_use_case
    .execute(RemovePaymentCommand {
      index: path.into_inner(),
    })
    .await?;

  editor_response(&req, &templates, &list_catalog_use_case, draft).await
}
