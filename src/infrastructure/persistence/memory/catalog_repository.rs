use async_trait::async_trait;
use rust_decimal_macros::dec;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::catalog::{
  BankAccount, CatalogError, CatalogItem, CatalogRepository, Client, DeliveryRoute, DisplayName,
  RouteCode,
};
use crate::domain::invoice::{Currency, Money};

#[derive(Default)]
struct CatalogRecords {
  clients: Vec<Client>,
  items: Vec<CatalogItem>,
  delivery_routes: Vec<DeliveryRoute>,
  bank_accounts: Vec<BankAccount>,
}

/// Catalog kept in process memory; lists come back in insertion order.
#[derive(Default)]
pub struct InMemoryCatalogRepository {
  records: RwLock<CatalogRecords>,
}

impl InMemoryCatalogRepository {
  pub fn new() -> Self {
    Self::default()
  }

  /// One client, two items, two routes and two bank accounts.
  pub fn with_demo_data() -> Result<Self, CatalogError> {
    let client = Client::new(DisplayName::new("Acme Corp")?, "123 Business St")
      .with_contact(
        Some("contact@acme.com".to_string()),
        Some("555-0123".to_string()),
      )
      .with_registration(Some("Paris".to_string()), None);

    let price = |amount| {
      Money::new(amount, Currency::EUR).map_err(|e| CatalogError::Repository(e.to_string()))
    };
    let items = vec![
      CatalogItem::new(
        DisplayName::new("Product A")?,
        price(dec!(100))?,
        "High quality product",
      ),
      CatalogItem::new(
        DisplayName::new("Service B")?,
        price(dec!(200))?,
        "Professional service",
      ),
    ];

    let delivery_routes = vec![
      DeliveryRoute::new(RouteCode::new("RT001")?, DisplayName::new("Downtown Route")?),
      DeliveryRoute::new(RouteCode::new("RT002")?, DisplayName::new("Suburban Route")?),
    ];

    let bank_accounts = vec![
      BankAccount::parse("Bank One", "DE89370400440532013000", "BANKFRPP")?,
      BankAccount::parse("Bank Two", "FR1420041010050500013M02606", "BKTKFRPP")?,
    ];

    Ok(Self {
      records: RwLock::new(CatalogRecords {
        clients: vec![client],
        items,
        delivery_routes,
        bank_accounts,
      }),
    })
  }

  pub async fn insert_client(&self, client: Client) {
    self.records.write().await.clients.push(client);
  }

  pub async fn insert_item(&self, item: CatalogItem) {
    self.records.write().await.items.push(item);
  }

  pub async fn insert_delivery_route(&self, route: DeliveryRoute) {
    self.records.write().await.delivery_routes.push(route);
  }

  pub async fn insert_bank_account(&self, account: BankAccount) {
    self.records.write().await.bank_accounts.push(account);
  }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
  async fn find_client(&self, id: Uuid) -> Result<Option<Client>, CatalogError> {
    let records = self.records.read().await;
    Ok(records.clients.iter().find(|c| c.id == id).cloned())
  }

  async fn list_clients(&self) -> Result<Vec<Client>, CatalogError> {
    Ok(self.records.read().await.clients.clone())
  }

  async fn find_item(&self, id: Uuid) -> Result<Option<CatalogItem>, CatalogError> {
    let records = self.records.read().await;
    Ok(records.items.iter().find(|i| i.id == id).cloned())
  }

  async fn list_items(&self) -> Result<Vec<CatalogItem>, CatalogError> {
    Ok(self.records.read().await.items.clone())
  }

  async fn find_delivery_route(&self, id: Uuid) -> Result<Option<DeliveryRoute>, CatalogError> {
    let records = self.records.read().await;
    Ok(records.delivery_routes.iter().find(|r| r.id == id).cloned())
  }

  async fn list_delivery_routes(&self) -> Result<Vec<DeliveryRoute>, CatalogError> {
    Ok(self.records.read().await.delivery_routes.clone())
  }

  async fn find_bank_account(&self, id: Uuid) -> Result<Option<BankAccount>, CatalogError> {
    let records = self.records.read().await;
    Ok(records.bank_accounts.iter().find(|a| a.id == id).cloned())
  }

  async fn list_bank_accounts(&self) -> Result<Vec<BankAccount>, CatalogError> {
    Ok(self.records.read().await.bank_accounts.clone())
  }

  async fn save_bank_account(&self, account: BankAccount) -> Result<BankAccount, CatalogError> {
    let mut records = self.records.write().await;
    let existing = records
      .bank_accounts
      .iter_mut()
      .find(|a| a.id == account.id)
      .ok_or(CatalogError::BankAccountNotFound(account.id))?;
    *existing = account.clone();
    Ok(account)
  }
}
