use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::catalog::{CatalogError, CatalogRepository};

#[derive(Debug, Clone, Serialize)]
pub struct CatalogOptionDto {
  pub id: Uuid,
  pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemOptionDto {
  pub id: Uuid,
  pub label: String,
  pub unit_price: Decimal,
  pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BankAccountOptionDto {
  pub id: Uuid,
  pub name: String,
  pub iban_formatted: String,
  pub bic: String,
}

/// Everything the editor dropdowns offer.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
  pub clients: Vec<CatalogOptionDto>,
  pub items: Vec<ItemOptionDto>,
  pub delivery_routes: Vec<CatalogOptionDto>,
  pub bank_accounts: Vec<BankAccountOptionDto>,
}

pub struct ListCatalogUseCase {
  catalog: Arc<dyn CatalogRepository>,
}

impl ListCatalogUseCase {
  pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
    Self { catalog }
  }

  pub async fn execute(&self) -> Result<CatalogResponse, CatalogError> {
    let clients = self
      .catalog
      .list_clients()
      .await?
      .into_iter()
      .map(|client| CatalogOptionDto {
        id: client.id,
        label: client.name.as_str().to_string(),
      })
      .collect();

    let items = self
      .catalog
      .list_items()
      .await?
      .into_iter()
      .map(|item| ItemOptionDto {
        id: item.id,
        label: item.name.as_str().to_string(),
        unit_price: item.unit_price.amount,
        description: item.description,
      })
      .collect();

    let delivery_routes = self
      .catalog
      .list_delivery_routes()
      .await?
      .into_iter()
      .map(|route| CatalogOptionDto {
        id: route.id,
        label: route.label(),
      })
      .collect();

    let bank_accounts = self
      .catalog
      .list_bank_accounts()
      .await?
      .into_iter()
      .map(|account| BankAccountOptionDto {
        id: account.id,
        name: account.name.as_str().to_string(),
        iban_formatted: account.iban.formatted(),
        bic: account.bic.as_str().to_string(),
      })
      .collect();

    Ok(CatalogResponse {
      clients,
      items,
      delivery_routes,
      bank_accounts,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::persistence::memory::InMemoryCatalogRepository;

  #[tokio::test]
  async fn test_lists_demo_catalog() {
    let catalog = ListCatalogUseCase::new(Arc::new(InMemoryCatalogRepository::with_demo_data().unwrap()))
      .execute()
      .await
      .unwrap();

    assert_eq!(catalog.clients.len(), 1);
    assert_eq!(catalog.items.len(), 2);
    assert_eq!(catalog.delivery_routes[0].label, "RT001 - Downtown Route");
    assert_eq!(catalog.bank_accounts.len(), 2);
  }
}
