use serde::{Deserialize, Serialize};

use super::entities::Invoice;
use super::errors::InvoiceError;
use super::value_objects::{Currency, Money, format_amount};
use crate::domain::catalog::entities::{Client, DeliveryRoute};

/// Shown wherever a value or reference is missing.
pub const PLACEHOLDER: &str = "N/A";
/// Label for a line with neither a custom name nor a catalog item.
pub const ITEM_PLACEHOLDER: &str = "Item";

const DATE_FORMAT: &str = "%d/%m/%Y";

/// The company issuing invoices, printed in the document header and footer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssuerProfile {
  pub name: String,
  pub address_lines: Vec<String>,
  pub siret: Option<String>,
  pub email: Option<String>,
  pub vat_number: Option<String>,
  pub logo_url: Option<String>,
  pub footer_lines: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientBlock {
  pub name: String,
  pub address: String,
  pub city: String,
  pub tax_id: String,
  pub email: String,
  pub phone: String,
  pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentLine {
  pub label: String,
  pub unit_price: String,
  pub quantity: u32,
  pub tax_rate: String,
  pub total: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentTotals {
  pub subtotal: String,
  pub tax_label: String,
  pub tax: String,
  pub discount: String,
  pub total: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxBracket {
  pub label: String,
  pub base: String,
  pub rate: String,
  pub amount: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentTermsBlock {
  pub amount_due: String,
  pub method: String,
  pub due_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BankBlock {
  pub name: String,
  pub iban: String,
  pub bic: String,
}

/// Fully formatted, print-ready view of a generated invoice.
///
/// Every string here is final: templates only lay it out.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDocument {
  pub number: String,
  pub date: String,
  pub client_number: String,
  pub issuer: IssuerProfile,
  pub client: ClientBlock,
  pub delivery_route: String,
  pub lines: Vec<DocumentLine>,
  pub totals: DocumentTotals,
  pub tax_breakdown: Vec<TaxBracket>,
  pub payment_terms: PaymentTermsBlock,
  pub bank: BankBlock,
}

impl InvoiceDocument {
  /// Builds the view from a generated invoice. Client and route are whatever the
  /// catalog resolved; `None` renders placeholders.
  pub fn build(
    invoice: &Invoice,
    client: Option<&Client>,
    route: Option<&DeliveryRoute>,
    issuer: &IssuerProfile,
  ) -> Result<Self, InvoiceError> {
    let finalization = invoice.finalization().ok_or(InvoiceError::NotFinalized)?;
    let currency = invoice.currency();
    let totals = &finalization.totals;
    let rate = totals.tax_rate.format_percent();

    let lines = invoice
      .items()
      .iter()
      .map(|item| DocumentLine {
        label: item.display_name().unwrap_or(ITEM_PLACEHOLDER).to_string(),
        unit_price: money(Some(item.unit_price), currency),
        quantity: item.quantity.value(),
        tax_rate: rate.clone(),
        total: money(Some(item.total()), currency),
      })
      .collect();

    let first_payment = invoice.first_payment();
    let bank = finalization.bank_details.as_ref();

    Ok(Self {
      number: finalization.number.to_string(),
      date: invoice.date().format(DATE_FORMAT).to_string(),
      client_number: client.map_or_else(|| PLACEHOLDER.to_string(), Client::reference),
      issuer: issuer.clone(),
      client: ClientBlock {
        name: or_placeholder(client.map(|c| c.name.as_str())),
        address: or_placeholder(client.map(|c| c.address.as_str())),
        city: or_placeholder(client.and_then(|c| c.city.as_deref())),
        tax_id: or_placeholder(client.and_then(|c| c.tax_id.as_deref())),
        email: or_placeholder(client.and_then(|c| c.email.as_deref())),
        phone: or_placeholder(client.and_then(|c| c.phone.as_deref())),
        logo_url: client.and_then(|c| c.logo_url.clone()),
      },
      delivery_route: route.map_or_else(|| PLACEHOLDER.to_string(), DeliveryRoute::label),
      lines,
      totals: DocumentTotals {
        subtotal: money(Some(totals.subtotal), currency),
        tax_label: format!("VAT {}", rate),
        tax: money(Some(totals.tax), currency),
        discount: format_amount(None, currency),
        total: money(Some(totals.total), currency),
      },
      tax_breakdown: vec![TaxBracket {
        label: "Normal".to_string(),
        base: money(Some(totals.subtotal), currency),
        rate,
        amount: money(Some(totals.tax), currency),
      }],
      payment_terms: PaymentTermsBlock {
        amount_due: money(Some(totals.total), currency),
        method: or_placeholder(first_payment.map(|p| p.method.label())),
        due_date: first_payment.map_or_else(
          || PLACEHOLDER.to_string(),
          |p| p.due_date.format(DATE_FORMAT).to_string(),
        ),
      },
      bank: BankBlock {
        name: or_placeholder(bank.map(|b| b.name.as_str())),
        iban: or_placeholder(bank.map(|b| b.iban_formatted.as_str())),
        bic: or_placeholder(bank.map(|b| b.bic.as_str())),
      },
    })
  }
}

fn money(value: Option<Money>, currency: Currency) -> String {
  format_amount(value.map(|m| m.amount), currency)
}

fn or_placeholder(value: Option<&str>) -> String {
  match value.map(str::trim) {
    Some(v) if !v.is_empty() => v.to_string(),
    _ => PLACEHOLDER.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::catalog::entities::{BankAccount, CatalogItem};
  use crate::domain::catalog::value_objects::{DisplayName, RouteCode};
  use crate::domain::invoice::entities::{
    BankDetails, Finalization, InvoiceTotals, ItemSelection, LineItemPatch, PaymentPatch,
  };
  use crate::domain::invoice::value_objects::{InvoiceNumber, PaymentMethod, Quantity, TaxRate};
  use chrono::NaiveDate;
  use rust_decimal_macros::dec;

  fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
  }

  fn eur(amount: rust_decimal::Decimal) -> Money {
    Money::new(amount, Currency::EUR).unwrap()
  }

  fn finalize(invoice: &mut Invoice, bank_details: Option<BankDetails>) {
    let subtotal = invoice
      .items()
      .iter()
      .fold(dec!(0), |acc, item| acc + item.total().amount);
    invoice.finalize(Finalization {
      number: InvoiceNumber::new("FAC032025RT042".to_string()).unwrap(),
      totals: InvoiceTotals {
        subtotal: eur(subtotal),
        tax: eur(subtotal).multiply(dec!(0.20)),
        total: eur(subtotal).multiply(dec!(1.20)),
        tax_rate: TaxRate::new(dec!(0.20)).unwrap(),
      },
      bank_details,
      generated_on: date(14),
    });
  }

  fn invoice_with_line(quantity: u32, price: rust_decimal::Decimal) -> Invoice {
    let mut invoice = Invoice::new(date(14), Currency::EUR);
    let id = invoice.add_item().id;
    invoice
      .update_item(
        id,
        LineItemPatch {
          quantity: Some(Quantity::new(quantity).unwrap()),
          unit_price: Some(eur(price)),
          custom_name: None,
        },
      )
      .unwrap();
    invoice
  }

  #[test]
  fn test_draft_cannot_be_rendered() {
    let invoice = Invoice::new(date(14), Currency::EUR);
    let result = InvoiceDocument::build(&invoice, None, None, &IssuerProfile::default());
    assert!(matches!(result, Err(InvoiceError::NotFinalized)));
  }

  #[test]
  fn test_totals_are_formatted_with_suffix() {
    let mut invoice = invoice_with_line(2, dec!(100));
    finalize(&mut invoice, None);

    let document =
      InvoiceDocument::build(&invoice, None, None, &IssuerProfile::default()).unwrap();

    assert_eq!(document.totals.subtotal, "200.00€");
    assert_eq!(document.totals.tax, "40.00€");
    assert_eq!(document.totals.total, "240.00€");
    assert_eq!(document.totals.tax_label, "VAT 20.00%");
    assert_eq!(document.totals.discount, "0.00€");
    assert_eq!(document.payment_terms.amount_due, "240.00€");
    assert_eq!(document.lines[0].unit_price, "100.00€");
    assert_eq!(document.lines[0].total, "200.00€");
    assert_eq!(document.tax_breakdown.len(), 1);
    assert_eq!(document.tax_breakdown[0].label, "Normal");
    assert_eq!(document.tax_breakdown[0].base, "200.00€");
  }

  #[test]
  fn test_missing_references_render_placeholders() {
    let mut invoice = invoice_with_line(1, dec!(10));
    finalize(&mut invoice, None);

    let document =
      InvoiceDocument::build(&invoice, None, None, &IssuerProfile::default()).unwrap();

    assert_eq!(document.payment_terms.due_date, PLACEHOLDER);
    assert_eq!(document.payment_terms.method, PLACEHOLDER);
    assert_eq!(document.client.name, PLACEHOLDER);
    assert_eq!(document.client.city, PLACEHOLDER);
    assert_eq!(document.client_number, PLACEHOLDER);
    assert_eq!(document.delivery_route, PLACEHOLDER);
    assert_eq!(document.bank.iban, PLACEHOLDER);
    assert_eq!(document.lines[0].label, ITEM_PLACEHOLDER);
  }

  #[test]
  fn test_custom_name_overrides_catalog_label() {
    let mut invoice = Invoice::new(date(14), Currency::EUR);
    let product = CatalogItem::new(DisplayName::new("Product A").unwrap(), eur(dec!(100)), "");
    let catalog_line = invoice.add_item().id;
    invoice
      .select_item(catalog_line, ItemSelection::Catalog(&product))
      .unwrap();
    let custom_line = invoice.add_item().id;
    invoice
      .select_item(custom_line, ItemSelection::Custom)
      .unwrap();
    invoice
      .update_item(
        custom_line,
        LineItemPatch {
          custom_name: Some("Night delivery".to_string()),
          ..Default::default()
        },
      )
      .unwrap();
    finalize(&mut invoice, None);

    let document =
      InvoiceDocument::build(&invoice, None, None, &IssuerProfile::default()).unwrap();

    assert_eq!(document.lines[0].label, "Product A");
    assert_eq!(document.lines[1].label, "Night delivery");
    assert_eq!(document.lines[1].unit_price, "0.00€");
  }

  #[test]
  fn test_resolved_references_and_first_payment() {
    let mut invoice = invoice_with_line(1, dec!(50));
    let client = Client::new(DisplayName::new("Acme Corp").unwrap(), "123 Business St")
      .with_registration(Some("Paris".to_string()), None);
    let route = DeliveryRoute::new(
      RouteCode::new("RT001").unwrap(),
      DisplayName::new("Downtown Route").unwrap(),
    );
    let first = invoice.add_payment(date(31));
    invoice
      .update_payment(
        first,
        PaymentPatch {
          method: Some(PaymentMethod::Cash),
          ..Default::default()
        },
      )
      .unwrap();
    invoice.add_payment(date(1));
    let account = BankAccount::parse("Bank One", "DE89370400440532013000", "DEUTDEFF").unwrap();
    finalize(&mut invoice, Some(BankDetails::snapshot_of(&account)));

    let document = InvoiceDocument::build(
      &invoice,
      Some(&client),
      Some(&route),
      &IssuerProfile::default(),
    )
    .unwrap();

    assert_eq!(document.client.name, "Acme Corp");
    assert_eq!(document.client.city, "Paris");
    assert_eq!(document.client.tax_id, PLACEHOLDER);
    assert_eq!(document.client_number, client.reference());
    assert_eq!(document.delivery_route, "RT001 - Downtown Route");
    assert_eq!(document.payment_terms.due_date, "31/03/2025");
    assert_eq!(document.payment_terms.method, "Cash");
    assert_eq!(document.bank.name, "Bank One");
    assert_eq!(document.bank.iban, "DE89 3704 0044 0532 0130 00");
    assert_eq!(document.bank.bic, "DEUTDEFF");
    assert_eq!(document.date, "14/03/2025");
    assert_eq!(document.number, "FAC032025RT042");
  }
}
