pub mod invoice_form;
pub mod list_invoices;
pub mod mutation_handler;
pub mod mutation_outcome;

pub use invoice_form::{
  FieldErrors, FormField, InvoiceForm, ValidationResult, validate_invoice_form,
};
pub use list_invoices::{InvoiceListItemDto, ListInvoicesResponse, ListInvoicesUseCase};
pub use mutation_handler::{
  INVOICES_PATH, Mutation, UpdateFailurePolicy, ValidatedMutationHandler,
};
pub use mutation_outcome::{FormState, MutationOutcome};
