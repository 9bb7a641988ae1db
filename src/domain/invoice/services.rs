use std::sync::Arc;

use super::entities::{Invoice, InvoiceChanges, InvoiceDraft, NewInvoice};
use super::errors::InvoiceError;
use super::ports::InvoiceRepository;

/// Derives persisted values from a validated draft and issues exactly one
/// statement per call.
pub struct InvoiceService {
  invoice_repo: Arc<dyn InvoiceRepository>,
}

impl InvoiceService {
  pub fn new(invoice_repo: Arc<dyn InvoiceRepository>) -> Self {
    Self { invoice_repo }
  }

  pub async fn create_invoice(&self, draft: &InvoiceDraft) -> Result<Invoice, InvoiceError> {
    let new_invoice = NewInvoice::from_draft(draft);
    let invoice = self.invoice_repo.create(new_invoice).await?;

    tracing::info!(
      invoice_id = %invoice.id,
      customer_id = %invoice.customer_id,
      amount_in_cents = invoice.amount_in_cents,
      "Invoice created"
    );
    Ok(invoice)
  }

  pub async fn update_invoice(&self, id: &str, draft: &InvoiceDraft) -> Result<(), InvoiceError> {
    let changes = InvoiceChanges::from(draft);
    let updated = self.invoice_repo.update(id, changes).await?;

    if updated == 0 {
      tracing::debug!(invoice_id = %id, "Update matched no invoice");
    } else {
      tracing::info!(invoice_id = %id, "Invoice updated");
    }
    Ok(())
  }

  /// Deleting an id that no longer exists is not an error.
  pub async fn delete_invoice(&self, id: &str) -> Result<(), InvoiceError> {
    let deleted = self.invoice_repo.delete(id).await?;

    if deleted == 0 {
      tracing::debug!(invoice_id = %id, "Delete matched no invoice");
    } else {
      tracing::info!(invoice_id = %id, "Invoice deleted");
    }
    Ok(())
  }

  pub async fn list_invoices(&self) -> Result<Vec<Invoice>, InvoiceError> {
    self.invoice_repo.list().await
  }
}
