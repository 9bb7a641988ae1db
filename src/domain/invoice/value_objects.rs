use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid customer: {0}")]
  InvalidCustomerId(String),
  #[error("Invalid amount: {0}")]
  InvalidAmount(String),
  #[error("Amount is not a number: {0}")]
  AmountNotANumber(String),
  #[error("Invalid invoice status: {0}")]
  InvalidStatus(String),
}

impl ValueObjectError {
  /// Message shown next to the offending form field.
  pub fn user_message(&self) -> &'static str {
    match self {
      ValueObjectError::InvalidCustomerId(_) => "Please select a customer",
      ValueObjectError::InvalidAmount(_) => "Please enter an amount greater than $0.",
      ValueObjectError::AmountNotANumber(_) => "Please enter a valid amount.",
      ValueObjectError::InvalidStatus(_) => "Please select an invoice status",
    }
  }
}

// Customer reference - opaque key of an existing customer row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerId(String);

impl CustomerId {
  pub fn new(value: &str) -> Result<Self, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidCustomerId(
        "Customer id cannot be empty".to_string(),
      ));
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for CustomerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Invoice Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
  Pending,
  Paid,
}

impl InvoiceStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      InvoiceStatus::Pending => "pending",
      InvoiceStatus::Paid => "paid",
    }
  }
}

impl FromStr for InvoiceStatus {
  type Err = ValueObjectError;

  // Exact match only: the form posts lowercase values
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(InvoiceStatus::Pending),
      "paid" => Ok(InvoiceStatus::Paid),
      _ => Err(ValueObjectError::InvalidStatus(format!(
        "Unknown status: {}",
        s
      ))),
    }
  }
}

impl fmt::Display for InvoiceStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Positive amount in major currency units as typed into the form.
///
/// The value in cents is fixed at construction, so every `Amount` is known
/// to fit the BIGINT column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount {
  value: Decimal,
  cents: i64,
}

impl Amount {
  pub fn new(value: Decimal) -> Result<Self, ValueObjectError> {
    if value <= Decimal::ZERO {
      return Err(ValueObjectError::InvalidAmount(
        "Amount must be greater than zero".to_string(),
      ));
    }
    let cents = Self::round_to_cents(value).ok_or_else(|| {
      ValueObjectError::InvalidAmount("Amount is too large".to_string())
    })?;
    Ok(Self { value, cents })
  }

  /// Coerces raw form text into an amount.
  ///
  /// Blank input counts as zero, so it fails the "greater than zero" rule
  /// rather than the "not a number" rule. Scientific notation is accepted.
  pub fn parse(raw: &str) -> Result<Self, ValueObjectError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return Self::new(Decimal::ZERO);
    }

    let value = Decimal::from_str(trimmed)
      .or_else(|_| Decimal::from_scientific(trimmed))
      .map_err(|_| ValueObjectError::AmountNotANumber(trimmed.to_string()))?;

    Self::new(value)
  }

  pub fn value(&self) -> Decimal {
    self.value
  }

  /// round(amount * 100), halves rounded away from zero.
  pub fn to_cents(&self) -> i64 {
    self.cents
  }

  fn round_to_cents(value: Decimal) -> Option<i64> {
    value
      .checked_mul(Decimal::ONE_HUNDRED)?
      .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
      .to_i64()
  }
}

impl fmt::Display for Amount {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "${:.2}", self.value)
  }
}
