//! In-memory doubles for the invoice ports.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use uuid::Uuid;

use super::entities::{Invoice, InvoiceChanges, NewInvoice};
use super::errors::InvoiceError;
use super::ports::{InvoiceRepository, PageCache};

#[derive(Default)]
pub struct InMemoryInvoiceRepository {
  rows: Mutex<Vec<Invoice>>,
  statements: AtomicUsize,
  fail: bool,
}

impl InMemoryInvoiceRepository {
  /// Every statement fails as if the database were unreachable.
  pub fn failing() -> Self {
    Self {
      fail: true,
      ..Self::default()
    }
  }

  pub fn invoices(&self) -> Vec<Invoice> {
    self.rows.lock().unwrap().clone()
  }

  pub fn find(&self, id: &str) -> Option<Invoice> {
    self.invoices().into_iter().find(|i| i.id == id)
  }

  pub fn statements(&self) -> usize {
    self.statements.load(Ordering::SeqCst)
  }

  fn begin(&self) -> Result<(), InvoiceError> {
    self.statements.fetch_add(1, Ordering::SeqCst);
    if self.fail {
      return Err(InvoiceError::Repository("connection refused".to_string()));
    }
    Ok(())
  }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
  async fn create(&self, invoice: NewInvoice) -> Result<Invoice, InvoiceError> {
    self.begin()?;
    let invoice = Invoice {
      id: Uuid::new_v4().to_string(),
      customer_id: invoice.customer_id,
      amount_in_cents: invoice.amount_in_cents,
      status: invoice.status,
      date: invoice.date,
    };
    self.rows.lock().unwrap().push(invoice.clone());
    Ok(invoice)
  }

  async fn update(&self, id: &str, changes: InvoiceChanges) -> Result<u64, InvoiceError> {
    self.begin()?;
    let mut rows = self.rows.lock().unwrap();
    match rows.iter_mut().find(|i| i.id == id) {
      Some(invoice) => {
        invoice.customer_id = changes.customer_id;
        invoice.amount_in_cents = changes.amount_in_cents;
        invoice.status = changes.status;
        Ok(1)
      }
      None => Ok(0),
    }
  }

  async fn delete(&self, id: &str) -> Result<u64, InvoiceError> {
    self.begin()?;
    let mut rows = self.rows.lock().unwrap();
    let before = rows.len();
    rows.retain(|i| i.id != id);
    Ok((before - rows.len()) as u64)
  }

  async fn list(&self) -> Result<Vec<Invoice>, InvoiceError> {
    self.begin()?;
    Ok(self.invoices())
  }
}

/// Repository whose `list` pauses after reading its rows until `resume` is
/// called, so a test can commit a write while a listing is in flight.
pub struct GatedInvoiceRepository {
  inner: Arc<InMemoryInvoiceRepository>,
  listed: Notify,
  resume: Notify,
}

impl GatedInvoiceRepository {
  pub fn new(inner: Arc<InMemoryInvoiceRepository>) -> Self {
    Self {
      inner,
      listed: Notify::new(),
      resume: Notify::new(),
    }
  }

  /// Waits until a `list` call has read its rows.
  pub async fn listed(&self) {
    self.listed.notified().await;
  }

  pub fn resume(&self) {
    self.resume.notify_one();
  }
}

#[async_trait]
impl InvoiceRepository for GatedInvoiceRepository {
  async fn create(&self, invoice: NewInvoice) -> Result<Invoice, InvoiceError> {
    self.inner.create(invoice).await
  }

  async fn update(&self, id: &str, changes: InvoiceChanges) -> Result<u64, InvoiceError> {
    self.inner.update(id, changes).await
  }

  async fn delete(&self, id: &str) -> Result<u64, InvoiceError> {
    self.inner.delete(id).await
  }

  async fn list(&self) -> Result<Vec<Invoice>, InvoiceError> {
    let rows = self.inner.list().await?;
    self.listed.notify_one();
    self.resume.notified().await;
    Ok(rows)
  }
}

/// Page cache that records every invalidation.
#[derive(Default)]
pub struct RecordingPageCache {
  pages: Mutex<HashMap<String, String>>,
  generations: Mutex<HashMap<String, u64>>,
  invalidated: Mutex<Vec<String>>,
  fail: bool,
}

impl RecordingPageCache {
  pub fn failing() -> Self {
    Self {
      fail: true,
      ..Self::default()
    }
  }

  pub fn invalidated(&self) -> Vec<String> {
    self.invalidated.lock().unwrap().clone()
  }
}

#[async_trait]
impl PageCache for RecordingPageCache {
  async fn get(&self, path: &str) -> Result<Option<String>, InvoiceError> {
    Ok(self.pages.lock().unwrap().get(path).cloned())
  }

  async fn generation(&self, path: &str) -> Result<u64, InvoiceError> {
    Ok(
      self
        .generations
        .lock()
        .unwrap()
        .get(path)
        .copied()
        .unwrap_or_default(),
    )
  }

  async fn put(&self, path: &str, html: &str, generation: u64) -> Result<bool, InvoiceError> {
    if self.generation(path).await? != generation {
      return Ok(false);
    }
    self
      .pages
      .lock()
      .unwrap()
      .insert(path.to_string(), html.to_string());
    Ok(true)
  }

  async fn invalidate(&self, path: &str) -> Result<(), InvoiceError> {
    self.invalidated.lock().unwrap().push(path.to_string());
    if self.fail {
      return Err(InvoiceError::Repository("cache unavailable".to_string()));
    }
    *self
      .generations
      .lock()
      .unwrap()
      .entry(path.to_string())
      .or_default() += 1;
    self.pages.lock().unwrap().remove(path);
    Ok(())
  }
}
