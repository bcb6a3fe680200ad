use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::draft_session::DraftSession;
use super::get_draft::{DraftResponse, LineItemDto};
use crate::domain::invoice::{
  InvoiceError, InvoiceService, LineItemPatch, LineItemSource, Money, Quantity,
};

pub struct AddLineItemUseCase {
  session: Arc<DraftSession>,
}

impl AddLineItemUseCase {
  pub fn new(session: Arc<DraftSession>) -> Self {
    Self { session }
  }

  pub async fn execute(&self) -> Result<LineItemDto, InvoiceError> {
    let mut draft = self.session.write().await;
    let item = LineItemDto::from(draft.add_item());
    tracing::debug!(item_id = %item.id, "Line item added");
    Ok(item)
  }
}

#[derive(Debug, Deserialize)]
pub struct RemoveLineItemCommand {
  pub item_id: Uuid,
}

pub struct RemoveLineItemUseCase {
  invoice_service: Arc<InvoiceService>,
  session: Arc<DraftSession>,
}

impl RemoveLineItemUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>, session: Arc<DraftSession>) -> Self {
    Self {
      invoice_service,
      session,
    }
  }

  pub async fn execute(
    &self,
    command: RemoveLineItemCommand,
  ) -> Result<DraftResponse, InvoiceError> {
    let mut draft = self.session.write().await;
    if !draft.remove_item(command.item_id) {
      tracing::debug!(item_id = %command.item_id, "Remove ignored, no such line item");
    }
    Ok(DraftResponse::build(&draft, &self.invoice_service))
  }
}

/// Raw form values; `None` leaves the field as it is.
#[derive(Debug, Deserialize)]
pub struct UpdateLineItemCommand {
  pub item_id: Uuid,
  pub quantity: Option<String>,
  pub unit_price: Option<String>,
  pub custom_name: Option<String>,
}

pub struct UpdateLineItemUseCase {
  invoice_service: Arc<InvoiceService>,
  session: Arc<DraftSession>,
}

impl UpdateLineItemUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>, session: Arc<DraftSession>) -> Self {
    Self {
      invoice_service,
      session,
    }
  }

  pub async fn execute(
    &self,
    command: UpdateLineItemCommand,
  ) -> Result<DraftResponse, InvoiceError> {
    // Parse everything before touching the draft so bad input keeps the last valid values
    let quantity = command.quantity.as_deref().map(Quantity::parse).transpose()?;
    let unit_price = command
      .unit_price
      .as_deref()
      .map(|raw| Money::parse(raw, self.session.currency()))
      .transpose()?;

    let mut draft = self.session.write().await;
    draft.update_item(
      command.item_id,
      LineItemPatch {
        quantity,
        unit_price,
        custom_name: command.custom_name,
      },
    )?;
    Ok(DraftResponse::build(&draft, &self.invoice_service))
  }
}

#[derive(Debug, Deserialize)]
pub struct SelectLineItemCommand {
  pub item_id: Uuid,
  /// Empty, `custom`, or a catalog item id
  pub selection: String,
}

pub struct SelectLineItemUseCase {
  invoice_service: Arc<InvoiceService>,
  session: Arc<DraftSession>,
}

impl SelectLineItemUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>, session: Arc<DraftSession>) -> Self {
    Self {
      invoice_service,
      session,
    }
  }

  pub async fn execute(
    &self,
    command: SelectLineItemCommand,
  ) -> Result<DraftResponse, InvoiceError> {
    let source = LineItemSource::parse(&command.selection)?;

    let mut draft = self.session.write().await;
    self
      .invoice_service
      .select_item(&mut draft, command.item_id, source)
      .await?;
    Ok(DraftResponse::build(&draft, &self.invoice_service))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::invoice::test_support::{demo_service, demo_session};
  use crate::domain::catalog::CatalogRepository;
  use crate::domain::invoice::{InvoiceEntityError, ValueObjectError};
  use rust_decimal_macros::dec;

  #[tokio::test]
  async fn test_update_recomputes_total_from_current_values() {
    let (service, _) = demo_service();
    let session = demo_session();
    let item = AddLineItemUseCase::new(session.clone()).execute().await.unwrap();
    let update = UpdateLineItemUseCase::new(service.clone(), session.clone());

    update
      .execute(UpdateLineItemCommand {
        item_id: item.id,
        quantity: None,
        unit_price: Some("100".to_string()),
        custom_name: None,
      })
      .await
      .unwrap();
    let draft = update
      .execute(UpdateLineItemCommand {
        item_id: item.id,
        quantity: Some("2".to_string()),
        unit_price: None,
        custom_name: None,
      })
      .await
      .unwrap();

    assert_eq!(draft.items[0].total, dec!(200));
    assert_eq!(draft.totals.total_formatted, "240.00€");
  }

  #[tokio::test]
  async fn test_malformed_quantity_keeps_last_valid_value() {
    let (service, _) = demo_service();
    let session = demo_session();
    let item = AddLineItemUseCase::new(session.clone()).execute().await.unwrap();
    let update = UpdateLineItemUseCase::new(service, session.clone());

    let result = update
      .execute(UpdateLineItemCommand {
        item_id: item.id,
        quantity: Some("abc".to_string()),
        unit_price: Some("5".to_string()),
        custom_name: None,
      })
      .await;

    assert!(matches!(
      result,
      Err(InvoiceError::Validation(ValueObjectError::InvalidQuantity(_)))
    ));
    let draft = session.read().await;
    assert_eq!(draft.items()[0].quantity.value(), 1);
    assert_eq!(draft.items()[0].unit_price.amount, dec!(0));
  }

  #[tokio::test]
  async fn test_update_unknown_item() {
    let (service, _) = demo_service();
    let session = demo_session();
    let unknown = Uuid::new_v4();

    let result = UpdateLineItemUseCase::new(service, session)
      .execute(UpdateLineItemCommand {
        item_id: unknown,
        quantity: Some("1".to_string()),
        unit_price: None,
        custom_name: None,
      })
      .await;

    assert!(matches!(
      result,
      Err(InvoiceError::Entity(InvoiceEntityError::LineItemNotFound(id))) if id == unknown
    ));
  }

  #[tokio::test]
  async fn test_remove_unknown_item_leaves_list() {
    let (service, _) = demo_service();
    let session = demo_session();
    let item = AddLineItemUseCase::new(session.clone()).execute().await.unwrap();

    let draft = RemoveLineItemUseCase::new(service, session)
      .execute(RemoveLineItemCommand {
        item_id: Uuid::new_v4(),
      })
      .await
      .unwrap();

    assert_eq!(draft.items.len(), 1);
    assert_eq!(draft.items[0].id, item.id);
  }

  #[tokio::test]
  async fn test_select_custom_then_name_it() {
    let (service, catalog) = demo_service();
    let session = demo_session();
    let item = AddLineItemUseCase::new(session.clone()).execute().await.unwrap();
    let select = SelectLineItemUseCase::new(service.clone(), session.clone());
    let product = catalog.list_items().await.unwrap().remove(0);

    let draft = select
      .execute(SelectLineItemCommand {
        item_id: item.id,
        selection: product.id.to_string(),
      })
      .await
      .unwrap();
    assert_eq!(draft.items[0].unit_price, product.unit_price.amount);

    select
      .execute(SelectLineItemCommand {
        item_id: item.id,
        selection: "custom".to_string(),
      })
      .await
      .unwrap();
    let draft = UpdateLineItemUseCase::new(service, session)
      .execute(UpdateLineItemCommand {
        item_id: item.id,
        quantity: None,
        unit_price: None,
        custom_name: Some("Pallet return".to_string()),
      })
      .await
      .unwrap();

    assert!(draft.items[0].is_custom);
    assert_eq!(draft.items[0].unit_price, dec!(0));
    assert_eq!(draft.items[0].display_name.as_deref(), Some("Pallet return"));
  }
}
