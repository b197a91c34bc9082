//! Integration tests for nonceward-cache

use async_trait::async_trait;
use nonceward_cache::*;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// A backend that only implements the required methods, so `delete_if_eq`
/// falls back to the trait default.
#[derive(Default)]
struct PlainCache {
    data: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl CacheStore for PlainCache {
    async fn get_json(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.data.lock().unwrap().get(key).cloned())
    }

    async fn set_json(&self, key: &str, value: String, _ttl: Option<Duration>) -> CacheResult<()> {
        self.data.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.data.lock().unwrap().remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        Ok(self.data.lock().unwrap().contains_key(key))
    }

    async fn clear(&self) -> CacheResult<()> {
        self.data.lock().unwrap().clear();
        Ok(())
    }

    async fn ttl(&self, _key: &str) -> CacheResult<Option<Duration>> {
        Ok(None)
    }
}

#[tokio::test]
async fn test_default_delete_if_eq_compares_first() {
    let cache = PlainCache::default();
    cache.set_json("nonce:a", "{}".to_string(), None).await.unwrap();

    assert!(!cache.delete_if_eq("nonce:a", "[]").await.unwrap());
    assert!(cache.exists("nonce:a").await.unwrap());

    assert!(cache.delete_if_eq("nonce:a", "{}").await.unwrap());
    assert!(!cache.exists("nonce:a").await.unwrap());
    assert!(!cache.delete_if_eq("nonce:a", "{}").await.unwrap());
}

#[tokio::test]
async fn test_in_memory_cache_through_trait_object() {
    let cache: Box<dyn CacheStore> = Box::new(InMemoryCache::new());

    cache
        .set_json("nonce:b", "payload".to_string(), Some(Duration::from_secs(60)))
        .await
        .unwrap();
    assert!(cache.exists("nonce:b").await.unwrap());
    assert!(cache.ttl("nonce:b").await.unwrap().is_some());

    cache.set_json("nonce:b", "replaced".to_string(), None).await.unwrap();
    assert_eq!(cache.get_json("nonce:b").await.unwrap(), Some("replaced".to_string()));
    assert_eq!(cache.ttl("nonce:b").await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn test_expired_entry_is_not_deleted_by_compare() {
    let cache = InMemoryCache::new();
    cache
        .set_json("nonce:c", "v".to_string(), Some(Duration::from_secs(5)))
        .await
        .unwrap();

    tokio::time::advance(Duration::from_secs(6)).await;

    assert!(!cache.delete_if_eq("nonce:c", "v").await.unwrap());
    assert_eq!(cache.evict_expired().await, 1);
    assert!(cache.is_empty().await);
}

#[test]
fn test_cache_config_defaults() {
    let config = CacheConfig::redis("redis://127.0.0.1:6379").unwrap();
    assert_eq!(config.connection_timeout, Duration::from_secs(5));
    assert_eq!(config.operation_timeout, Duration::from_secs(3));
    assert_eq!(config.key_prefix, None);
}
