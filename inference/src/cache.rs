//! In-memory response cache keyed by the raw request bytes, with a TTL and a size bound.

use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Serialized response bodies keyed by the exact request bytes that produced them.
///
/// Entries expire `ttl` after insertion. Each entry weighs the length of its key
/// plus its body, and once `max_bytes` is reached the least useful entries are
/// evicted. Concurrent inserts for the same key keep the last value written.
#[derive(Clone)]
pub struct ResponseCache {
    inner: Cache<Vec<u8>, Arc<[u8]>>,
}

impl ResponseCache {
    pub fn new(max_bytes: u64, ttl: Duration) -> Self {
        let inner = Cache::builder()
            .weigher(|key: &Vec<u8>, body: &Arc<[u8]>| {
                u32::try_from(key.len() + body.len()).unwrap_or(u32::MAX)
            })
            .max_capacity(max_bytes)
            .time_to_live(ttl)
            .build();

        Self { inner }
    }

    /// Key for a request: path with query string, a newline, then the body bytes
    /// exactly as received.
    pub fn request_key(path_and_query: &str, body: &[u8]) -> Vec<u8> {
        let mut key = Vec::with_capacity(path_and_query.len() + 1 + body.len());
        key.extend_from_slice(path_and_query.as_bytes());
        key.push(b'\n');
        key.extend_from_slice(body);
        key
    }

    pub fn get(&self, key: &[u8]) -> Option<Arc<[u8]>> {
        self.inner.get(key)
    }

    pub fn insert(&self, key: Vec<u8>, body: Arc<[u8]>) {
        self.inner.insert(key, body);
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }

    /// Total bytes of keys and bodies currently held.
    pub fn weighted_size(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.weighted_size()
    }
}
