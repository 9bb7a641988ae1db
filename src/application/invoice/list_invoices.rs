use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::invoice::{InvoiceError, InvoiceService};

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceListItemDto {
  pub id: String,
  pub customer_id: String,
  pub amount_in_cents: i64,
  pub formatted_amount: String,
  pub status: String,
  pub is_paid: bool,
  pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct ListInvoicesResponse {
  pub invoices: Vec<InvoiceListItemDto>,
}

pub struct ListInvoicesUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl ListInvoicesUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self) -> Result<ListInvoicesResponse, InvoiceError> {
    let invoices = self.invoice_service.list_invoices().await?;

    let invoices = invoices
      .into_iter()
      .map(|invoice| InvoiceListItemDto {
        formatted_amount: invoice.formatted_amount(),
        is_paid: invoice.is_paid(),
        status: invoice.status.as_str().to_string(),
        id: invoice.id,
        customer_id: invoice.customer_id.into_inner(),
        amount_in_cents: invoice.amount_in_cents,
        date: invoice.date,
      })
      .collect();

    Ok(ListInvoicesResponse { invoices })
  }
}
