use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use serde::Serialize;
use std::fmt;

use crate::domain::catalog::CatalogError;
use crate::domain::export::ExportError;
use crate::domain::invoice::{InvoiceEntityError, InvoiceError, ValueObjectError};

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum ApiError {
  /// Malformed or rejected input (400 Bad Request)
  Validation(String),

  /// Referenced record does not exist (404 Not Found)
  NotFound(String),

  /// Action not possible in the draft's current state (409 Conflict)
  Conflict(String),

  /// External renderer failed (502 Bad Gateway)
  Upstream(String),

  /// External renderer did not answer in time (504 Gateway Timeout)
  Timeout(String),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
      ApiError::Upstream(msg) => write!(f, "Upstream error: {}", msg),
      ApiError::Timeout(msg) => write!(f, "Timeout: {}", msg),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
      ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, message) = match self {
      ApiError::Validation(msg) => ("validation_error", msg.clone()),
      ApiError::NotFound(msg) => ("not_found", msg.clone()),
      ApiError::Conflict(msg) => ("conflict", msg.clone()),
      ApiError::Upstream(msg) => {
        tracing::error!("Upstream error: {}", msg);
        ("upstream_error", "Document rendering failed".to_string())
      }
      ApiError::Timeout(msg) => {
        tracing::error!("Timeout: {}", msg);
        ("timeout", msg.clone())
      }
      ApiError::Internal(msg) => {
        // Don't expose internal error details in production
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
        )
      }
    };

    if status.is_client_error() {
      tracing::warn!(status = status.as_u16(), "{}", message);
    }

    let error_response = ErrorResponse {
      error: error_type.to_string(),
      message,
      details: None,
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(error_response)
  }
}

impl From<ValueObjectError> for ApiError {
  fn from(error: ValueObjectError) -> Self {
    ApiError::Validation(error.to_string())
  }
}

impl From<CatalogError> for ApiError {
  fn from(error: CatalogError) -> Self {
    match error {
      CatalogError::ClientNotFound(_)
      | CatalogError::ItemNotFound(_)
      | CatalogError::DeliveryRouteNotFound(_)
      | CatalogError::BankAccountNotFound(_) => ApiError::NotFound(error.to_string()),
      CatalogError::Validation(e) => ApiError::Validation(e.to_string()),
      CatalogError::Repository(e) => ApiError::Internal(format!("Repository error: {}", e)),
    }
  }
}

impl From<InvoiceError> for ApiError {
  fn from(error: InvoiceError) -> Self {
    match error {
      InvoiceError::Validation(e) => ApiError::from(e),
      InvoiceError::Entity(e) => match e {
        InvoiceEntityError::LineItemNotFound(_) | InvoiceEntityError::PaymentNotFound(_) => {
          ApiError::NotFound(e.to_string())
        }
        InvoiceEntityError::BankAccountNotAllowed
        | InvoiceEntityError::CustomNameNotAllowed
        | InvoiceEntityError::CustomNameTooLong { .. } => ApiError::Validation(e.to_string()),
      },
      InvoiceError::Catalog(e) => ApiError::from(e),
      InvoiceError::NotFinalized | InvoiceError::SequenceExhausted { .. } => {
        ApiError::Conflict(error.to_string())
      }
      InvoiceError::Numbering(_) | InvoiceError::Rendering(_) | InvoiceError::Internal(_) => {
        ApiError::Internal(error.to_string())
      }
    }
  }
}

impl From<ExportError> for ApiError {
  fn from(error: ExportError) -> Self {
    match error {
      ExportError::NothingToExport(_) => ApiError::Conflict(error.to_string()),
      ExportError::RasterizationFailed(_) => ApiError::Upstream(error.to_string()),
      ExportError::Timeout(_) => ApiError::Timeout(error.to_string()),
      ExportError::PdfAssemblyFailed(_) => ApiError::Internal(error.to_string()),
      ExportError::Invoice(e) => ApiError::from(e),
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();

    ApiError::Validation(messages.join(", "))
  }
}
