use async_trait::async_trait;

use super::entities::{Invoice, InvoiceChanges, NewInvoice};
use super::errors::InvoiceError;

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
  async fn create(&self, invoice: NewInvoice) -> Result<Invoice, InvoiceError>;
  /// Returns the number of rows touched (0 when the id is unknown).
  async fn update(&self, id: &str, changes: InvoiceChanges) -> Result<u64, InvoiceError>;
  /// Returns the number of rows removed (0 when the id is unknown).
  async fn delete(&self, id: &str) -> Result<u64, InvoiceError>;
  async fn list(&self) -> Result<Vec<Invoice>, InvoiceError>;
}

/// Rendered pages keyed by route path.
///
/// Every path carries a generation that `invalidate` bumps. A page rendered
/// from data read before an invalidation must not be stored after it, so
/// callers read the generation before loading data and hand it back to
/// `put`, which only stores the page if the generation is still current.
#[async_trait]
pub trait PageCache: Send + Sync {
  async fn get(&self, path: &str) -> Result<Option<String>, InvoiceError>;
  async fn generation(&self, path: &str) -> Result<u64, InvoiceError>;
  /// Returns `false` when the page was rendered from stale data and dropped.
  async fn put(&self, path: &str, html: &str, generation: u64) -> Result<bool, InvoiceError>;
  async fn invalidate(&self, path: &str) -> Result<(), InvoiceError>;
}
