use std::sync::Arc;
use tera::Tera;

pub const INVOICES_PAGE: &str = "pages/invoices.html.tera";
pub const INVOICE_FORM_STATE: &str = "partials/invoice_form_state.html.tera";

/// Template engine wrapper for rendering HTML templates
#[derive(Clone)]
pub struct TemplateEngine {
  tera: Arc<Tera>,
}

impl TemplateEngine {
  /// Load every template matching `glob`, e.g. `templates/**/*.html.tera`
  pub fn new(glob: &str) -> Result<Self, tera::Error> {
    Ok(Self::from_tera(Tera::new(glob)?))
  }

  pub fn from_tera(mut tera: Tera) -> Self {
    tera.autoescape_on(vec!["html.tera", ".html"]);
    Self {
      tera: Arc::new(tera),
    }
  }

  /// Render a template with the given context
  pub fn render(&self, template: &str, context: &tera::Context) -> Result<String, tera::Error> {
    self.tera.render(template, context)
  }
}
