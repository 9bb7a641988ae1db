use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::invoice::{Amount, CustomerId, InvoiceDraft, InvoiceStatus, ValueObjectError};

/// Raw invoice form as submitted by the browser.
///
/// Every field is kept as text and defaults to empty when absent, so that
/// nothing is trusted before [`validate_invoice_form`] has run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceForm {
  #[serde(default)]
  #[validate(custom(function = "validate_customer_id"))]
  pub customer_id: String,

  #[serde(default)]
  #[validate(custom(function = "validate_amount"))]
  pub amount: String,

  #[serde(default)]
  #[validate(custom(function = "validate_status"))]
  pub status: String,
}

impl InvoiceForm {
  pub fn new(
    customer_id: impl Into<String>,
    amount: impl Into<String>,
    status: impl Into<String>,
  ) -> Self {
    Self {
      customer_id: customer_id.into(),
      amount: amount.into(),
      status: status.into(),
    }
  }

  fn to_draft(&self) -> Result<InvoiceDraft, FieldErrors> {
    let mut errors = FieldErrors::default();

    let customer_id = CustomerId::new(&self.customer_id)
      .map_err(|e| errors.push_value_error(FormField::CustomerId, &e))
      .ok();
    let amount = Amount::parse(&self.amount)
      .map_err(|e| errors.push_value_error(FormField::Amount, &e))
      .ok();
    let status = InvoiceStatus::from_str(&self.status)
      .map_err(|e| errors.push_value_error(FormField::Status, &e))
      .ok();

    match (customer_id, amount, status) {
      (Some(customer_id), Some(amount), Some(status)) => {
        Ok(InvoiceDraft::new(customer_id, amount, status))
      }
      _ => Err(errors),
    }
  }
}

fn field_error(code: &'static str, error: &ValueObjectError) -> ValidationError {
  let mut validation_error = ValidationError::new(code);
  validation_error.message = Some(Cow::Borrowed(error.user_message()));
  validation_error
}

fn validate_customer_id(value: &str) -> Result<(), ValidationError> {
  CustomerId::new(value)
    .map(|_| ())
    .map_err(|e| field_error("customer_id", &e))
}

fn validate_amount(value: &str) -> Result<(), ValidationError> {
  Amount::parse(value)
    .map(|_| ())
    .map_err(|e| field_error("amount", &e))
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
  InvoiceStatus::from_str(value)
    .map(|_| ())
    .map_err(|e| field_error("status", &e))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
  CustomerId,
  Amount,
  Status,
}

impl FormField {
  /// Accepts both the struct field name and the form key.
  pub fn from_key(key: &str) -> Option<Self> {
    match key {
      "customer_id" | "customerId" => Some(FormField::CustomerId),
      "amount" => Some(FormField::Amount),
      "status" => Some(FormField::Status),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      FormField::CustomerId => "customerId",
      FormField::Amount => "amount",
      FormField::Status => "status",
    }
  }
}

/// Per-field user-facing messages, in the order they were raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
  #[serde(rename = "customerId", skip_serializing_if = "Vec::is_empty")]
  pub customer_id: Vec<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub amount: Vec<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub status: Vec<String>,
}

impl FieldErrors {
  pub fn push(&mut self, field: FormField, message: impl Into<String>) {
    self.messages_mut(field).push(message.into());
  }

  fn push_value_error(&mut self, field: FormField, error: &ValueObjectError) {
    self.push(field, error.user_message());
  }

  pub fn get(&self, field: FormField) -> &[String] {
    match field {
      FormField::CustomerId => &self.customer_id,
      FormField::Amount => &self.amount,
      FormField::Status => &self.status,
    }
  }

  pub fn has(&self, field: FormField) -> bool {
    !self.get(field).is_empty()
  }

  pub fn is_empty(&self) -> bool {
    self.customer_id.is_empty() && self.amount.is_empty() && self.status.is_empty()
  }

  fn messages_mut(&mut self, field: FormField) -> &mut Vec<String> {
    match field {
      FormField::CustomerId => &mut self.customer_id,
      FormField::Amount => &mut self.amount,
      FormField::Status => &mut self.status,
    }
  }
}

impl From<ValidationErrors> for FieldErrors {
  fn from(errors: ValidationErrors) -> Self {
    let mut field_errors = FieldErrors::default();

    for (key, field_errs) in errors.field_errors() {
      let key: &str = key.as_ref();
      let Some(field) = FormField::from_key(key) else {
        tracing::warn!(field = key, "Validation error for unknown form field");
        continue;
      };
      for error in field_errs.iter() {
        let message = error
          .message
          .as_ref()
          .map(|m| m.to_string())
          .unwrap_or_else(|| format!("Invalid field: {}", field.as_str()));
        field_errors.push(field, message);
      }
    }

    field_errors
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
  Valid(InvoiceDraft),
  Invalid(FieldErrors),
}

impl ValidationResult {
  pub fn is_valid(&self) -> bool {
    matches!(self, ValidationResult::Valid(_))
  }

  pub fn errors(&self) -> Option<&FieldErrors> {
    match self {
      ValidationResult::Valid(_) => None,
      ValidationResult::Invalid(errors) => Some(errors),
    }
  }
}

/// Checks the raw form and, when every field passes, coerces it into a draft.
pub fn validate_invoice_form(form: &InvoiceForm) -> ValidationResult {
  if let Err(errors) = Validate::validate(form) {
    return ValidationResult::Invalid(FieldErrors::from(errors));
  }

  match form.to_draft() {
    Ok(draft) => ValidationResult::Valid(draft),
    Err(errors) => ValidationResult::Invalid(errors),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_valid_form() {
    let form = InvoiceForm::new("c1", "250", "paid");

    match validate_invoice_form(&form) {
      ValidationResult::Valid(draft) => {
        assert_eq!(draft.customer_id.value(), "c1");
        assert_eq!(draft.amount.value(), dec!(250));
        assert_eq!(draft.status, InvoiceStatus::Paid);
      }
      ValidationResult::Invalid(errors) => panic!("unexpected errors: {:?}", errors),
    }
  }

  #[test]
  fn test_missing_customer_id() {
    for customer_id in ["", "   "] {
      let result = validate_invoice_form(&InvoiceForm::new(customer_id, "10", "pending"));
      let errors = result.errors().expect("form should be invalid");

      assert_eq!(errors.customer_id, vec!["Please select a customer"]);
      assert!(!errors.has(FormField::Amount));
      assert!(!errors.has(FormField::Status));
    }
  }

  #[test]
  fn test_non_positive_amounts() {
    for amount in ["0", "-1", "-0.01", "0.00", ""] {
      let result = validate_invoice_form(&InvoiceForm::new("c1", amount, "paid"));
      let errors = result.errors().expect("form should be invalid");

      assert_eq!(
        errors.amount,
        vec!["Please enter an amount greater than $0."],
        "amount {:?}",
        amount
      );
    }
  }

  #[test]
  fn test_non_numeric_amounts() {
    for amount in ["abc", "12,50", "NaN", "$10"] {
      let result = validate_invoice_form(&InvoiceForm::new("c1", amount, "paid"));
      let errors = result.errors().expect("form should be invalid");

      assert_eq!(
        errors.amount,
        vec!["Please enter a valid amount."],
        "amount {:?}",
        amount
      );
    }
  }

  #[test]
  fn test_invalid_status() {
    for status in ["", "PAID", "overdue", "draft"] {
      let result = validate_invoice_form(&InvoiceForm::new("c1", "10", status));
      let errors = result.errors().expect("form should be invalid");

      assert_eq!(errors.status, vec!["Please select an invoice status"]);
    }
  }

  #[test]
  fn test_every_field_reported() {
    let result = validate_invoice_form(&InvoiceForm::default());
    let errors = result.errors().expect("form should be invalid");

    assert!(errors.has(FormField::CustomerId));
    assert!(errors.has(FormField::Amount));
    assert!(errors.has(FormField::Status));
  }

  #[test]
  fn test_field_errors_serialization() {
    let mut errors = FieldErrors::default();
    errors.push(FormField::Amount, "Please enter an amount greater than $0.");

    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(
      json,
      serde_json::json!({ "amount": ["Please enter an amount greater than $0."] })
    );

    errors.push(FormField::CustomerId, "Please select a customer");
    let json = serde_json::to_value(&errors).unwrap();
    assert!(json.get("customerId").is_some());
  }
}
