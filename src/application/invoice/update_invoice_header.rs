use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::draft_session::DraftSession;
use super::get_draft::DraftResponse;
use crate::domain::invoice::{InvoiceError, InvoiceService};

#[derive(Debug, Deserialize)]
pub struct UpdateInvoiceHeaderCommand {
  pub date: NaiveDate,
  pub client_id: Option<Uuid>,
  pub delivery_route_id: Option<Uuid>,
}

pub struct UpdateInvoiceHeaderUseCase {
  invoice_service: Arc<InvoiceService>,
  session: Arc<DraftSession>,
}

impl UpdateInvoiceHeaderUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>, session: Arc<DraftSession>) -> Self {
    Self {
      invoice_service,
      session,
    }
  }

  pub async fn execute(
    &self,
    command: UpdateInvoiceHeaderCommand,
  ) -> Result<DraftResponse, InvoiceError> {
    let mut draft = self.session.write().await;
    self
      .invoice_service
      .set_header(
        &mut draft,
        command.date,
        command.client_id,
        command.delivery_route_id,
      )
      .await?;
    Ok(DraftResponse::build(&draft, &self.invoice_service))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::invoice::test_support::{demo_service, demo_session};
  use crate::domain::catalog::{CatalogError, CatalogRepository};

  #[tokio::test]
  async fn test_header_update() {
    let (service, catalog) = demo_service();
    let session = demo_session();
    let client = catalog.list_clients().await.unwrap().remove(0);
    let route = catalog.list_delivery_routes().await.unwrap().remove(0);
    let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();

    let draft = UpdateInvoiceHeaderUseCase::new(service, session)
      .execute(UpdateInvoiceHeaderCommand {
        date,
        client_id: Some(client.id),
        delivery_route_id: Some(route.id),
      })
      .await
      .unwrap();

    assert_eq!(draft.date, date);
    assert_eq!(draft.client_id, Some(client.id));
    assert_eq!(draft.delivery_route_id, Some(route.id));
  }

  #[tokio::test]
  async fn test_unknown_route_is_rejected() {
    let (service, _) = demo_service();
    let session = demo_session();

    let result = UpdateInvoiceHeaderUseCase::new(service, session)
      .execute(UpdateInvoiceHeaderCommand {
        date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        client_id: None,
        delivery_route_id: Some(Uuid::new_v4()),
      })
      .await;

    assert!(matches!(
      result,
      Err(InvoiceError::Catalog(CatalogError::DeliveryRouteNotFound(_)))
    ));
  }
}
