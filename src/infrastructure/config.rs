use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::export::PageLayout;
use crate::domain::invoice::{
  Currency, InvoiceNumberGenerator, IssuerProfile, MonthlyCounterGenerator, NumberFormat,
  RandomSequenceGenerator, TaxRate, ValueObjectError,
};

fn default_tax_rate() -> Decimal {
  Decimal::new(20, 2)
}

fn default_currency() -> String {
  "EUR".to_string()
}

fn default_number_prefix() -> String {
  "FAC".to_string()
}

fn default_number_marker() -> String {
  "RT".to_string()
}

fn default_page_width_mm() -> f64 {
  210.0
}

fn default_page_height_mm() -> f64 {
  297.0
}

fn default_bottom_margin_mm() -> f64 {
  15.0
}

fn default_render_width_px() -> u32 {
  794
}

fn default_export_timeout() -> u64 {
  30
}

fn default_template_glob() -> String {
  "templates/**/*.html.tera".to_string()
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub server: ServerConfig,
  #[serde(default)]
  pub invoice: InvoiceConfig,
  #[serde(default)]
  pub issuer: IssuerConfig,
  #[serde(default)]
  pub export: ExportConfig,
  #[serde(default)]
  pub templates: TemplatesConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberingMode {
  /// Random three-digit sequence per number
  #[default]
  Random,
  /// In-memory counter per month
  Sequential,
}

/// Invoice numbering and tax settings
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceConfig {
  #[serde(default = "default_tax_rate")]
  pub tax_rate: Decimal,
  #[serde(default = "default_currency")]
  pub currency: String,
  #[serde(default = "default_number_prefix")]
  pub number_prefix: String,
  #[serde(default = "default_number_marker")]
  pub number_marker: String,
  #[serde(default)]
  pub numbering: NumberingMode,
}

impl Default for InvoiceConfig {
  fn default() -> Self {
    Self {
      tax_rate: default_tax_rate(),
      currency: default_currency(),
      number_prefix: default_number_prefix(),
      number_marker: default_number_marker(),
      numbering: NumberingMode::default(),
    }
  }
}

impl InvoiceConfig {
  pub fn tax_rate(&self) -> Result<TaxRate, ValueObjectError> {
    TaxRate::new(self.tax_rate)
  }

  pub fn currency(&self) -> Result<Currency, ValueObjectError> {
    Currency::from_str(&self.currency)
  }

  pub fn number_generator(&self) -> Box<dyn InvoiceNumberGenerator> {
    let format = NumberFormat::new(self.number_prefix.clone(), self.number_marker.clone());
    match self.numbering {
      NumberingMode::Random => Box::new(RandomSequenceGenerator::new(format)),
      NumberingMode::Sequential => Box::new(MonthlyCounterGenerator::new(format)),
    }
  }
}

/// Company printed as the issuer on every invoice
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssuerConfig {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub address_lines: Vec<String>,
  pub siret: Option<String>,
  pub email: Option<String>,
  pub vat_number: Option<String>,
  pub logo_url: Option<String>,
  #[serde(default)]
  pub footer_lines: Vec<String>,
}

impl From<IssuerConfig> for IssuerProfile {
  fn from(config: IssuerConfig) -> Self {
    IssuerProfile {
      name: config.name,
      address_lines: config.address_lines,
      siret: config.siret,
      email: config.email,
      vat_number: config.vat_number,
      logo_url: config.logo_url,
      footer_lines: config.footer_lines,
    }
  }
}

/// PDF export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
  #[serde(default = "default_page_width_mm")]
  pub page_width_mm: f64,
  #[serde(default = "default_page_height_mm")]
  pub page_height_mm: f64,
  #[serde(default = "default_bottom_margin_mm")]
  pub bottom_margin_mm: f64,
  /// Viewport width the HTML is rendered at before scaling to the page
  #[serde(default = "default_render_width_px")]
  pub render_width_px: u32,
  pub wkhtmltoimage_path: Option<String>,
  #[serde(default = "default_export_timeout")]
  pub timeout_seconds: u64,
}

impl Default for ExportConfig {
  fn default() -> Self {
    Self {
      page_width_mm: default_page_width_mm(),
      page_height_mm: default_page_height_mm(),
      bottom_margin_mm: default_bottom_margin_mm(),
      render_width_px: default_render_width_px(),
      wkhtmltoimage_path: None,
      timeout_seconds: default_export_timeout(),
    }
  }
}

impl ExportConfig {
  pub fn layout(&self) -> PageLayout {
    PageLayout {
      page_width_mm: self.page_width_mm,
      page_height_mm: self.page_height_mm,
      bottom_margin_mm: self.bottom_margin_mm,
    }
  }

  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_seconds)
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesConfig {
  #[serde(default = "default_template_glob")]
  pub glob: String,
}

impl Default for TemplatesConfig {
  fn default() -> Self {
    Self {
      glob: default_template_glob(),
    }
  }
}

impl Config {
  /// Load configuration from files and environment variables
  ///
  /// Later sources override earlier ones:
  /// 1. config/default.toml
  /// 2. config/local.toml (if exists)
  /// 3. config/{RUN_MODE}.toml (if exists)
  /// 4. Environment variables with the FACTURE_ prefix, sections separated by
  ///    double underscores: `FACTURE_SERVER__PORT=8080`,
  ///    `FACTURE_INVOICE__NUMBERING=sequential`, `FACTURE_EXPORT__TIMEOUT_SECONDS=10`
  pub fn load() -> Result<Self, ConfigError> {
    let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    let config = ConfigBuilder::builder()
      .add_source(File::with_name("config/default").required(true))
      .add_source(File::with_name("config/local").required(false))
      .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
      .add_source(
        Environment::with_prefix("FACTURE")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?;

    config.try_deserialize()
  }
}
