use serde::Deserialize;
use std::sync::Arc;

use crate::domain::invoice::{InvoiceDraft, InvoiceService, PageCache, PersistError};

use super::invoice_form::{InvoiceForm, ValidationResult, validate_invoice_form};
use super::mutation_outcome::{FormState, MutationOutcome};

/// Route of the invoice listing page.
pub const INVOICES_PATH: &str = "/dashboard/invoices";

pub const CREATE_INVALID_MESSAGE: &str = "Missing fields. Failed to create invoice.";
pub const UPDATE_INVALID_MESSAGE: &str = "Failed to update the invoice";
pub const CREATE_FAILED_MESSAGE: &str = "Failed to create an invoice.";
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update the invoice.";
pub const DELETE_FAILED_MESSAGE: &str = "Database Error: Failed to delete the invoice";

/// What to do when the UPDATE statement fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateFailurePolicy {
  /// Log the failure and continue as if the update succeeded.
  #[default]
  Swallow,
  /// Surface the failure like create and delete do.
  Report,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
  Create { form: InvoiceForm },
  Update { id: String, form: InvoiceForm },
  Delete { id: String },
}

/// Validates form input, issues one statement and refreshes the listing page.
pub struct ValidatedMutationHandler {
  invoice_service: Arc<InvoiceService>,
  page_cache: Arc<dyn PageCache>,
  update_failure: UpdateFailurePolicy,
}

impl ValidatedMutationHandler {
  pub fn new(invoice_service: Arc<InvoiceService>, page_cache: Arc<dyn PageCache>) -> Self {
    Self {
      invoice_service,
      page_cache,
      update_failure: UpdateFailurePolicy::default(),
    }
  }

  pub fn with_update_failure_policy(mut self, policy: UpdateFailurePolicy) -> Self {
    self.update_failure = policy;
    self
  }

  pub fn validate(&self, form: &InvoiceForm) -> ValidationResult {
    validate_invoice_form(form)
  }

  pub async fn handle(&self, mutation: Mutation) -> MutationOutcome {
    match mutation {
      Mutation::Create { form } => match self.validate(&form) {
        ValidationResult::Invalid(errors) => MutationOutcome::ValidationFailed {
          state: FormState::invalid(errors, CREATE_INVALID_MESSAGE),
        },
        ValidationResult::Valid(draft) => match self.create(&draft).await {
          Ok(()) => Self::navigate_to_listing(),
          Err(e) => MutationOutcome::PersistFailed { message: e.message },
        },
      },
      Mutation::Update { id, form } => match self.validate(&form) {
        ValidationResult::Invalid(errors) => MutationOutcome::ValidationFailed {
          state: FormState::invalid(errors, UPDATE_INVALID_MESSAGE),
        },
        ValidationResult::Valid(draft) => match self.update(&id, &draft).await {
          Ok(()) => Self::navigate_to_listing(),
          Err(e) => MutationOutcome::PersistFailed { message: e.message },
        },
      },
      Mutation::Delete { id } => match self.delete_invoice(&id).await {
        Ok(()) => MutationOutcome::Success { navigate_to: None },
        Err(e) => MutationOutcome::PersistFailed { message: e.message },
      },
    }
  }

  pub async fn create(&self, draft: &InvoiceDraft) -> Result<(), PersistError> {
    if let Err(e) = self.invoice_service.create_invoice(draft).await {
      tracing::error!(customer_id = %draft.customer_id, error = %e, "Failed to create invoice");
      return Err(PersistError::new(CREATE_FAILED_MESSAGE));
    }

    self.revalidate_listing().await;
    Ok(())
  }

  pub async fn update(&self, id: &str, draft: &InvoiceDraft) -> Result<(), PersistError> {
    if let Err(e) = self.invoice_service.update_invoice(id, draft).await {
      tracing::error!(invoice_id = %id, error = %e, "Failed to update invoice");
      if self.update_failure == UpdateFailurePolicy::Report {
        return Err(PersistError::new(UPDATE_FAILED_MESSAGE));
      }
    }

    self.revalidate_listing().await;
    Ok(())
  }

  pub async fn delete_invoice(&self, id: &str) -> Result<(), PersistError> {
    if let Err(e) = self.invoice_service.delete_invoice(id).await {
      tracing::error!(invoice_id = %id, error = %e, "Failed to delete invoice");
      return Err(PersistError::new(DELETE_FAILED_MESSAGE));
    }

    self.revalidate_listing().await;
    Ok(())
  }

  // The statement has already committed, so a cache failure is only logged.
  async fn revalidate_listing(&self) {
    if let Err(e) = self.page_cache.invalidate(INVOICES_PATH).await {
      tracing::warn!(path = INVOICES_PATH, error = %e, "Failed to invalidate page cache");
    }
  }

  fn navigate_to_listing() -> MutationOutcome {
    MutationOutcome::Success {
      navigate_to: Some(INVOICES_PATH.to_string()),
    }
  }
}
