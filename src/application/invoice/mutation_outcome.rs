use serde::Serialize;

use super::invoice_form::FieldErrors;

/// State handed back to the form after a rejected submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
  #[serde(skip_serializing_if = "FieldErrors::is_empty")]
  pub errors: FieldErrors,
  pub message: String,
}

impl FormState {
  pub fn invalid(errors: FieldErrors, message: impl Into<String>) -> Self {
    Self {
      errors,
      message: message.into(),
    }
  }

  /// Storage failures carry no field-level detail.
  pub fn message(message: impl Into<String>) -> Self {
    Self {
      errors: FieldErrors::default(),
      message: message.into(),
    }
  }
}

/// Result of one mutation, returned to the caller who performs navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
  Success { navigate_to: Option<String> },
  ValidationFailed { state: FormState },
  PersistFailed { message: String },
}

impl MutationOutcome {
  pub fn is_success(&self) -> bool {
    matches!(self, MutationOutcome::Success { .. })
  }

  /// Form state to render back to the caller, if the mutation failed.
  pub fn form_state(&self) -> Option<FormState> {
    match self {
      MutationOutcome::Success { .. } => None,
      MutationOutcome::ValidationFailed { state } => Some(state.clone()),
      MutationOutcome::PersistFailed { message } => Some(FormState::message(message.clone())),
    }
  }
}
