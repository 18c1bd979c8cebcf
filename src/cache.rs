use log::debug;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::time::{Duration, Instant};

/// Cache key for a request: `prefix:path`, plus a digest of the query
/// parameters when there are any. Parameter order does not matter.
pub fn cache_key(prefix: &str, path: &str, params: &BTreeMap<String, String>) -> String {
    let key = format!("{}:{}", prefix, path);
    if params.is_empty() {
        return key;
    }

    let query = serde_json::to_string(params).unwrap_or_default();
    let digest = Sha256::digest(query.as_bytes());
    let hash: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{}:{}", key, hash)
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// In-memory cache-aside store with per-entry TTL
pub struct ResponseCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> ResponseCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fresh value for `key`, evicting it if it has expired
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: String, value: V, ttl: Duration) {
        self.entries.lock().insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Return the cached value, or run `compute` and cache its `Ok` result.
    ///
    /// The lock is not held while `compute` runs, so two concurrent misses
    /// may both compute; the later insert wins.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: &str, ttl: Duration, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            debug!("Cache hit: {}", key);
            return Ok(value);
        }

        debug!("Cache miss: {}", key);
        let value = compute().await?;
        self.insert(key.to_string(), value.clone(), ttl);
        Ok(value)
    }

    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_cache_key_without_params() {
        assert_eq!(cache_key("questions", "/api/questions", &BTreeMap::new()), "questions:/api/questions");
    }

    #[test]
    fn test_cache_key_is_order_independent() {
        let mut a = BTreeMap::new();
        a.insert("query".to_string(), "rust".to_string());
        a.insert("page".to_string(), "1".to_string());

        let mut b = BTreeMap::new();
        b.insert("page".to_string(), "1".to_string());
        b.insert("query".to_string(), "rust".to_string());

        let key = cache_key("questions", "/search", &a);
        assert_eq!(key, cache_key("questions", "/search", &b));
        assert!(key.starts_with("questions:/search:"));
        assert_eq!(key.len(), "questions:/search:".len() + 64);

        b.insert("query".to_string(), "go".to_string());
        assert_ne!(key, cache_key("questions", "/search", &b));
    }

    #[tokio::test]
    async fn test_compute_once_while_fresh() {
        let cache: ResponseCache<String> = ResponseCache::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        for _ in 0..3 {
            let value = cache
                .get_or_try_insert_with("k", Duration::from_secs(60), move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>("computed".to_string())
                })
                .await
                .unwrap();
            assert_eq!(value, "computed");
        }

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache: ResponseCache<u32> = ResponseCache::new();

        let first = cache
            .get_or_try_insert_with("k", Duration::from_secs(60), || async { Err::<u32, _>("boom") })
            .await;
        assert_eq!(first, Err("boom"));
        assert!(cache.is_empty());

        let second = cache
            .get_or_try_insert_with("k", Duration::from_secs(60), || async { Ok::<_, &str>(7) })
            .await;
        assert_eq!(second, Ok(7));
    }

    #[test]
    fn test_expired_entries() {
        let cache: ResponseCache<u32> = ResponseCache::new();
        cache.insert("stale".to_string(), 1, Duration::ZERO);
        cache.insert("fresh".to_string(), 2, Duration::from_secs(60));

        assert_eq!(cache.get("stale"), None);
        assert_eq!(cache.get("fresh"), Some(2));

        cache.insert("stale".to_string(), 1, Duration::ZERO);
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
    }
}
