pub mod document;
pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use document::{InvoiceDocument, IssuerProfile};
pub use entities::{
  BankDetails, Finalization, Invoice, InvoiceItem, InvoiceTotals, ItemSelection, LineItemPatch,
  Payment, PaymentPatch,
};
pub use errors::{InvoiceEntityError, InvoiceError};
pub use ports::{DocumentRenderer, InvoiceNumberGenerator};
pub use services::{
  InvoiceService, MonthlyCounterGenerator, NumberFormat, RandomSequenceGenerator, TotalsCalculator,
};
pub use value_objects::{
  Currency, InvoiceNumber, InvoiceStatus, LineItemSource, Money, PaymentMethod, Quantity, TaxRate,
  ValueObjectError,
};
