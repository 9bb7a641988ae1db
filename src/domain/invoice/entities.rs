use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::value_objects::{Amount, CustomerId, InvoiceStatus};

// InvoiceDraft - validated form input, lives for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
  pub customer_id: CustomerId,
  pub amount: Amount,
  pub status: InvoiceStatus,
}

impl InvoiceDraft {
  pub fn new(customer_id: CustomerId, amount: Amount, status: InvoiceStatus) -> Self {
    Self {
      customer_id,
      amount,
      status,
    }
  }

  pub fn amount_in_cents(&self) -> i64 {
    self.amount.to_cents()
  }
}

// NewInvoice - row to insert; the database assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
  pub customer_id: CustomerId,
  pub amount_in_cents: i64,
  pub status: InvoiceStatus,
  pub date: NaiveDate,
}

impl NewInvoice {
  /// Stamps the draft with today's UTC date.
  pub fn from_draft(draft: &InvoiceDraft) -> Self {
    Self::dated(draft, Utc::now().date_naive())
  }

  pub fn dated(draft: &InvoiceDraft, date: NaiveDate) -> Self {
    Self {
      customer_id: draft.customer_id.clone(),
      amount_in_cents: draft.amount_in_cents(),
      status: draft.status,
      date,
    }
  }
}

// InvoiceChanges - columns an edit may overwrite; the date is kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceChanges {
  pub customer_id: CustomerId,
  pub amount_in_cents: i64,
  pub status: InvoiceStatus,
}

impl From<&InvoiceDraft> for InvoiceChanges {
  fn from(draft: &InvoiceDraft) -> Self {
    Self {
      customer_id: draft.customer_id.clone(),
      amount_in_cents: draft.amount_in_cents(),
      status: draft.status,
    }
  }
}

// Invoice - persisted row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
  pub id: String,
  pub customer_id: CustomerId,
  pub amount_in_cents: i64,
  pub status: InvoiceStatus,
  pub date: NaiveDate,
}

impl Invoice {
  pub fn is_paid(&self) -> bool {
    matches!(self.status, InvoiceStatus::Paid)
  }

  /// Amount formatted for display, e.g. `$250.00`.
  pub fn formatted_amount(&self) -> String {
    let sign = if self.amount_in_cents < 0 { "-" } else { "" };
    let cents = self.amount_in_cents.unsigned_abs();
    format!("{}${}.{:02}", sign, cents / 100, cents % 100)
  }
}
