use actix_web::{HttpResponse, web};
use std::sync::Arc;

use crate::application::invoice::{ListInvoicesUseCase, ValidatedMutationHandler};
use crate::domain::invoice::PageCache;

use super::handlers::invoices_web;
use super::templates::TemplateEngine;

/// Everything the invoice routes pull from app data.
#[derive(Clone)]
pub struct InvoiceRouteDependencies {
  pub templates: TemplateEngine,
  pub page_cache: Arc<dyn PageCache>,
  pub mutation_handler: Arc<ValidatedMutationHandler>,
  pub list_invoices_use_case: Arc<ListInvoicesUseCase>,
}

/// Configure invoice dashboard routes
///
/// # Routes
///
/// - GET /dashboard/invoices - Invoice listing (page cached)
/// - POST /dashboard/invoices/create - Create an invoice from form input
/// - POST /dashboard/invoices/{id}/edit - Update an invoice from form input
/// - DELETE /dashboard/invoices/{id} - Delete an invoice
/// - POST /dashboard/invoices/{id}/delete - Delete an invoice (plain form fallback)
pub fn configure_invoice_routes(cfg: &mut web::ServiceConfig, deps: InvoiceRouteDependencies) {
  cfg.service(
    web::scope("/dashboard/invoices")
      .app_data(web::Data::new(deps.templates))
      .app_data(web::Data::new(deps.page_cache))
      .app_data(web::Data::new(deps.mutation_handler))
      .app_data(web::Data::new(deps.list_invoices_use_case))
      .route("", web::get().to(invoices_web::invoices_page))
      .route(
        "/create",
        web::post().to(invoices_web::create_invoice_submit),
      )
      .route(
        "/{id}/edit",
        web::post().to(invoices_web::update_invoice_submit),
      )
      .route("/{id}", web::delete().to(invoices_web::delete_invoice))
      .route(
        "/{id}/delete",
        web::post().to(invoices_web::delete_invoice),
      ),
  );
}

/// Configure the liveness probe at GET /health
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
  cfg.route(
    "/health",
    web::get().to(|| async { HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })) }),
  );
}
