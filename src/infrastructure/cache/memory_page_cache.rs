use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::domain::invoice::{InvoiceError, PageCache};

#[derive(Default)]
struct CachedPath {
  page: Option<(String, Instant)>,
  generation: u64,
}

/// Process-local page cache, used when Redis is not configured.
pub struct InMemoryPageCache {
  paths: RwLock<HashMap<String, CachedPath>>,
  ttl: Duration,
}

impl InMemoryPageCache {
  pub fn new(ttl: Duration) -> Self {
    Self {
      paths: RwLock::new(HashMap::new()),
      ttl,
    }
  }
}

#[async_trait]
impl PageCache for InMemoryPageCache {
  async fn get(&self, path: &str) -> Result<Option<String>, InvoiceError> {
    let paths = self.paths.read().await;
    Ok(
      paths
        .get(path)
        .and_then(|cached| cached.page.as_ref())
        .filter(|(_, stored_at)| stored_at.elapsed() < self.ttl)
        .map(|(html, _)| html.clone()),
    )
  }

  async fn generation(&self, path: &str) -> Result<u64, InvoiceError> {
    let paths = self.paths.read().await;
    Ok(paths.get(path).map_or(0, |cached| cached.generation))
  }

  async fn put(&self, path: &str, html: &str, generation: u64) -> Result<bool, InvoiceError> {
    let mut paths = self.paths.write().await;
    let cached = paths.entry(path.to_string()).or_default();
    // Checked under the write lock so an invalidate cannot slip in between
    if cached.generation != generation {
      return Ok(false);
    }
    cached.page = Some((html.to_string(), Instant::now()));
    Ok(true)
  }

  async fn invalidate(&self, path: &str) -> Result<(), InvoiceError> {
    let mut paths = self.paths.write().await;
    let cached = paths.entry(path.to_string()).or_default();
    cached.page = None;
    cached.generation += 1;
    Ok(())
  }
}
