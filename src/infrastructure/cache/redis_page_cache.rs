use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};

use crate::domain::invoice::{InvoiceError, PageCache};

// KEYS[1] generation, KEYS[2] page; ARGV[1] expected generation, ARGV[2] html, ARGV[3] ttl
const PUT_IF_CURRENT: &str = r"
local current = redis.call('GET', KEYS[1]) or '0'
if current ~= ARGV[1] then
  return 0
end
redis.call('SET', KEYS[2], ARGV[2], 'EX', ARGV[3])
return 1
";

/// Redis-backed page cache.
///
/// Pages are stored under `page:<path>` with a TTL and generations under
/// `page-generation:<path>`. The generation check and the write run as one
/// script, so a page rendered before an invalidation is never stored after it.
pub struct RedisPageCache {
  redis: ConnectionManager,
  ttl_seconds: u64,
  put_if_current: Script,
}

impl RedisPageCache {
  pub fn new(redis: ConnectionManager, ttl_seconds: u64) -> Self {
    Self {
      redis,
      ttl_seconds,
      put_if_current: Script::new(PUT_IF_CURRENT),
    }
  }

  fn key(path: &str) -> String {
    format!("page:{}", path)
  }

  fn generation_key(path: &str) -> String {
    format!("page-generation:{}", path)
  }
}

#[async_trait]
impl PageCache for RedisPageCache {
  async fn get(&self, path: &str) -> Result<Option<String>, InvoiceError> {
    let mut conn = self.redis.clone();
    let html: Option<String> = conn.get(Self::key(path)).await?;
    Ok(html)
  }

  async fn generation(&self, path: &str) -> Result<u64, InvoiceError> {
    let mut conn = self.redis.clone();
    let generation: Option<u64> = conn.get(Self::generation_key(path)).await?;
    Ok(generation.unwrap_or_default())
  }

  async fn put(&self, path: &str, html: &str, generation: u64) -> Result<bool, InvoiceError> {
    let mut conn = self.redis.clone();
    let stored: i64 = self
      .put_if_current
      .key(Self::generation_key(path))
      .key(Self::key(path))
      .arg(generation)
      .arg(html)
      .arg(self.ttl_seconds)
      .invoke_async(&mut conn)
      .await?;
    Ok(stored == 1)
  }

  async fn invalidate(&self, path: &str) -> Result<(), InvoiceError> {
    let mut conn = self.redis.clone();
    let (generation,): (u64,) = redis::pipe()
      .atomic()
      .incr(Self::generation_key(path), 1)
      .del(Self::key(path))
      .ignore()
      .query_async(&mut conn)
      .await?;
    tracing::debug!(path, generation, "Page cache invalidated");
    Ok(())
  }
}
