use actix_web::{HttpResponse, http::StatusCode, web};
use std::sync::Arc;

use crate::adapters::http::{
  errors::ApiError,
  templates::{INVOICE_FORM_STATE, INVOICES_PAGE, TemplateEngine},
};
use crate::application::invoice::{
  INVOICES_PATH, InvoiceForm, ListInvoicesUseCase, Mutation, MutationOutcome,
  ValidatedMutationHandler,
};
use crate::domain::invoice::PageCache;

/// Event the listing page listens on to refresh itself after a delete.
pub const INVOICES_CHANGED_EVENT: &str = "invoices-changed";

/// Turns a mutation outcome into the htmx response the form expects.
fn outcome_response(
  outcome: MutationOutcome,
  templates: &TemplateEngine,
) -> Result<HttpResponse, ApiError> {
  let status = match &outcome {
    MutationOutcome::Success {
      navigate_to: Some(path),
    } => {
      return Ok(
        HttpResponse::Ok()
          .insert_header(("HX-Redirect", path.as_str()))
          .finish(),
      );
    }
    MutationOutcome::Success { navigate_to: None } => {
      return Ok(
        HttpResponse::Ok()
          .insert_header(("HX-Trigger", INVOICES_CHANGED_EVENT))
          .finish(),
      );
    }
    MutationOutcome::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
    MutationOutcome::PersistFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
  };

  let mut context = tera::Context::new();
  context.insert("state", &outcome.form_state());

  let html = templates.render(INVOICE_FORM_STATE, &context)?;

  Ok(
    HttpResponse::build(status)
      .content_type("text/html")
      .body(html),
  )
}

// GET /dashboard/invoices - Invoice listing, served from the page cache when fresh
pub async fn invoices_page(
  templates: web::Data<TemplateEngine>,
  page_cache: web::Data<Arc<dyn PageCache>>,
  list_invoices_use_case: web::Data<Arc<ListInvoicesUseCase>>,
) -> Result<HttpResponse, ApiError> {
  match page_cache.get(INVOICES_PATH).await {
    Ok(Some(html)) => {
      return Ok(HttpResponse::Ok().content_type("text/html").body(html));
    }
    Ok(None) => {}
    Err(e) => tracing::warn!(path = INVOICES_PATH, error = %e, "Page cache read failed"),
  }

  // Read before loading rows so a mutation committed meanwhile wins
  let generation = match page_cache.generation(INVOICES_PATH).await {
    Ok(generation) => Some(generation),
    Err(e) => {
      tracing::warn!(path = INVOICES_PATH, error = %e, "Page cache read failed");
      None
    }
  };

  let response = list_invoices_use_case.execute().await?;

  let mut context = tera::Context::new();
  context.insert("invoices", &response.invoices);

  let html = templates.render(INVOICES_PAGE, &context)?;

  if let Some(generation) = generation {
    match page_cache.put(INVOICES_PATH, &html, generation).await {
      Ok(true) => {}
      Ok(false) => tracing::debug!(path = INVOICES_PATH, "Listing changed while rendering, not cached"),
      Err(e) => tracing::warn!(path = INVOICES_PATH, error = %e, "Page cache write failed"),
    }
  }

  Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

// POST /dashboard/invoices/create - Create a new invoice
pub async fn create_invoice_submit(
  form: web::Form<InvoiceForm>,
  templates: web::Data<TemplateEngine>,
  mutation_handler: web::Data<Arc<ValidatedMutationHandler>>,
) -> Result<HttpResponse, ApiError> {
  let outcome = mutation_handler
    .handle(Mutation::Create {
      form: form.into_inner(),
    })
    .await;

  outcome_response(outcome, &templates)
}

// POST /dashboard/invoices/{id}/edit - Update an invoice
pub async fn update_invoice_submit(
  path: web::Path<String>,
  form: web::Form<InvoiceForm>,
  templates: web::Data<TemplateEngine>,
  mutation_handler: web::Data<Arc<ValidatedMutationHandler>>,
) -> Result<HttpResponse, ApiError> {
  let outcome = mutation_handler
    .handle(Mutation::Update {
      id: path.into_inner(),
      form: form.into_inner(),
    })
    .await;

  outcome_response(outcome, &templates)
}

// DELETE /dashboard/invoices/{id} - Delete an invoice
pub async fn delete_invoice(
  path: web::Path<String>,
  templates: web::Data<TemplateEngine>,
  mutation_handler: web::Data<Arc<ValidatedMutationHandler>>,
) -> Result<HttpResponse, ApiError> {
  let outcome = mutation_handler
    .handle(Mutation::Delete {
      id: path.into_inner(),
    })
    .await;

  outcome_response(outcome, &templates)
}
