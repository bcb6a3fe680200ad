use std::sync::Arc;
use tera::Tera;

use crate::domain::invoice::{DocumentRenderer, InvoiceDocument, InvoiceError};

const DOCUMENT_TEMPLATE: &str = "invoice/document.html.tera";

/// Template engine wrapper for rendering HTML templates
#[derive(Clone)]
pub struct TemplateEngine {
  tera: Arc<Tera>,
}

impl TemplateEngine {
  /// Load every template matching `glob`, e.g. `templates/**/*.html.tera`
  pub fn new(glob: &str) -> Result<Self, tera::Error> {
    let mut tera = Tera::new(glob)?;
    tera.autoescape_on(vec!["html.tera", ".html"]);

    Ok(Self {
      tera: Arc::new(tera),
    })
  }

  /// Render a template with the given context
  pub fn render(&self, template: &str, context: &tera::Context) -> Result<String, tera::Error> {
    self.tera.render(template, context)
  }
}

impl DocumentRenderer for TemplateEngine {
  fn render_invoice(&self, document: &InvoiceDocument) -> Result<String, InvoiceError> {
    let mut context = tera::Context::new();
    context.insert("invoice", document);

    self.render(DOCUMENT_TEMPLATE, &context).map_err(|e| {
      // Tera keeps the useful part in the source chain
      let cause = std::error::Error::source(&e)
        .map(|source| format!("{}: {}", e, source))
        .unwrap_or_else(|| e.to_string());
      InvoiceError::Rendering(cause)
    })
  }
}
