mod memory_page_cache;
mod redis_page_cache;

pub use memory_page_cache::InMemoryPageCache;
pub use redis_page_cache::RedisPageCache;
