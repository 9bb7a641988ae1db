pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod templates;

// Re-export commonly used types
pub use dtos::ErrorResponse;
pub use errors::ApiError;
pub use middleware::{RequestId, RequestIdMiddleware};
pub use routes::{InvoiceRouteDependencies, configure_health_routes, configure_invoice_routes};
pub use templates::TemplateEngine;
