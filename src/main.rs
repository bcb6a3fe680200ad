use actix_web::{App, HttpServer, middleware::Logger};
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use facture::{
  adapters::http::{InvoiceEditorDependencies, configure_invoice_editor_routes},
  application::invoice::DraftSession,
  domain::invoice::{InvoiceService, IssuerProfile, TotalsCalculator},
  infrastructure::{
    config::Config,
    pdf::{PaginatedPdfAssembler, WkHtmlToImageRasterizer},
    persistence::memory::InMemoryCatalogRepository,
    templates::TemplateEngine,
  },
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "facture=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting Facture invoice editor");

  // Load configuration
  let config = Config::load().context("Failed to load configuration")?;
  tracing::info!("Configuration loaded successfully");

  let tax_rate = config
    .invoice
    .tax_rate()
    .context("Invalid invoice.tax_rate")?;
  let currency = config
    .invoice
    .currency()
    .context("Invalid invoice.currency")?;
  let layout = config.export.layout();
  layout.validate().context("Invalid export page layout")?;

  // Catalog is seeded in memory until a persistent store exists
  let catalog = Arc::new(
    InMemoryCatalogRepository::with_demo_data().context("Failed to seed demo catalog")?,
  );
  tracing::info!("Demo catalog loaded");

  let number_generator = Arc::from(config.invoice.number_generator());
  tracing::info!(
    numbering = ?config.invoice.numbering,
    prefix = %config.invoice.number_prefix,
    "Invoice numbering configured"
  );

  let invoice_service = Arc::new(InvoiceService::new(
    catalog.clone(),
    number_generator,
    TotalsCalculator::new(tax_rate),
  ));
  let session = Arc::new(DraftSession::new(currency));

  // Initialize template engine
  let templates =
    TemplateEngine::new(&config.templates.glob).context("Failed to load templates")?;
  tracing::info!(glob = %config.templates.glob, "Templates loaded");

  let rasterizer = Arc::new(WkHtmlToImageRasterizer::new(
    config.export.wkhtmltoimage_path.clone(),
    config.export.render_width_px,
    config.export.timeout(),
  ));
  let assembler = Arc::new(PaginatedPdfAssembler::new());

  let dependencies = InvoiceEditorDependencies::new(
    templates,
    invoice_service,
    catalog,
    session,
    IssuerProfile::from(config.issuer.clone()),
    rasterizer,
    assembler,
    layout,
  );

  let server_host = config.server.host.clone();
  let server_port = config.server.port;
  tracing::info!("Starting HTTP server at http://{}:{}", server_host, server_port);

  HttpServer::new(move || {
    let dependencies = dependencies.clone();
    App::new()
      // Add logging middleware
      .wrap(Logger::default())
      .configure(move |cfg| configure_invoice_editor_routes(cfg, dependencies))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await?;

  Ok(())
}
