use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{BankAccount, CatalogItem, Client, DeliveryRoute};
use super::errors::CatalogError;

/// Read access to the reference data an invoice points at.
///
/// Lookups return `Ok(None)` for unknown identifiers; callers decide whether that
/// is an error (editor selections) or a placeholder (rendering).
#[async_trait]
pub trait CatalogRepository: Send + Sync {
  async fn find_client(&self, id: Uuid) -> Result<Option<Client>, CatalogError>;
  async fn list_clients(&self) -> Result<Vec<Client>, CatalogError>;

  async fn find_item(&self, id: Uuid) -> Result<Option<CatalogItem>, CatalogError>;
  async fn list_items(&self) -> Result<Vec<CatalogItem>, CatalogError>;

  async fn find_delivery_route(&self, id: Uuid) -> Result<Option<DeliveryRoute>, CatalogError>;
  async fn list_delivery_routes(&self) -> Result<Vec<DeliveryRoute>, CatalogError>;

  async fn find_bank_account(&self, id: Uuid) -> Result<Option<BankAccount>, CatalogError>;
  async fn list_bank_accounts(&self) -> Result<Vec<BankAccount>, CatalogError>;
  async fn save_bank_account(&self, account: BankAccount) -> Result<BankAccount, CatalogError>;
}
