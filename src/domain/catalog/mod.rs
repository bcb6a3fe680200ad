pub mod entities;
pub mod errors;
pub mod ports;
pub mod value_objects;

pub use entities::{BankAccount, CatalogItem, Client, DeliveryRoute};
pub use errors::{CatalogError, ValidationError};
pub use ports::CatalogRepository;
pub use value_objects::{Bic, DisplayName, Iban, RouteCode};
