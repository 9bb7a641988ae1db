use super::value_objects::ValueObjectError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvoiceError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Page cache error: {0}")]
  Cache(#[from] redis::RedisError),

  #[error("Repository error: {0}")]
  Repository(String),
}

/// Storage failure surfaced to the form as a single message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PersistError {
  pub message: String,
}

impl PersistError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}
