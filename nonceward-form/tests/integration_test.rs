//! Integration tests for nonceward-form

use nonceward_cache::InMemoryCache;
use nonceward_core::*;
use nonceward_form::{FormInput, NonceForm};
use std::sync::Arc;

async fn rendered_value(cache: &Arc<InMemoryCache>) -> String {
    let manager = NoncesManager::new(CacheStorage::from_arc(cache.clone()));
    let mut form = NonceForm::new("token", manager, FormInput::new());
    form.field_value().await.unwrap()
}

fn submission(cache: &Arc<InMemoryCache>, raw: &str) -> NonceForm<CacheStorage<InMemoryCache>> {
    let manager = NoncesManager::new(CacheStorage::from_arc(cache.clone()));
    NonceForm::new("token", manager, FormInput::from_pairs([("token", raw)]))
}

#[tokio::test]
async fn test_field_value_format() {
    let cache = Arc::new(InMemoryCache::new());
    let value = rendered_value(&cache).await;

    let (name, secret) = value.split_once(':').unwrap();
    assert!(!name.is_empty());
    assert_eq!(secret.len(), 32);
    assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_submitted_token_scenario() {
    let cache = Arc::new(InMemoryCache::new());
    let form = submission(&cache, "x:y");

    assert!(form.was_submitted());
    assert_eq!(form.submitted_name(), Some("x"));
    assert_eq!(form.submitted_value(), Some("y"));
}

#[tokio::test]
async fn test_valid_submission_is_idempotent() {
    let cache = Arc::new(InMemoryCache::new());
    let value = rendered_value(&cache).await;

    let mut form = submission(&cache, &value);
    assert!(form.is_submitted_valid().await.unwrap());
    assert!(cache.is_empty().await);

    // answered from memory, the entry is already gone
    assert!(form.is_submitted_valid().await.unwrap());
    assert!(!form.is_submitted_invalid().await.unwrap());

    // a replay on a fresh request fails
    let mut replay = submission(&cache, &value);
    assert!(!replay.is_submitted_valid().await.unwrap());
    assert!(replay.is_submitted_invalid().await.unwrap());
}

#[tokio::test]
async fn test_garbage_submission_is_invalid() {
    let cache = Arc::new(InMemoryCache::new());
    rendered_value(&cache).await;

    let mut form = submission(&cache, "12345");
    assert!(!form.is_submitted_valid().await.unwrap());
    assert!(form.is_submitted_invalid().await.unwrap());
    assert!(form.is_submitted_invalid().await.unwrap());
}

#[tokio::test]
async fn test_wrong_value_still_consumes() {
    let cache = Arc::new(InMemoryCache::new());
    let value = rendered_value(&cache).await;
    let (name, secret) = value.split_once(':').unwrap();

    let mut form = submission(&cache, &format!("{}:{}", name, "0".repeat(32)));
    assert!(!form.is_submitted_valid().await.unwrap());

    let mut form = submission(&cache, &format!("{}:{}", name, secret));
    assert!(!form.is_submitted_valid().await.unwrap());
}

#[tokio::test]
async fn test_value_with_separators_round_trips() {
    struct ColonRandom;

    impl Randomizer for ColonRandom {
        fn randomize(&self) -> String {
            "a:b::c".to_string()
        }
    }

    let session = SharedNonceMap::default();
    let manager =
        NoncesManager::new(MemoryStorage::with_map(session.clone())).with_randomizer(ColonRandom);
    let mut form = NonceForm::new("token", manager, FormInput::new());
    let value = form.field_value().await.unwrap();

    let manager = NoncesManager::new(MemoryStorage::with_map(session.clone()));
    let mut form = NonceForm::new("token", manager, FormInput::from_pairs([("token", value)]));
    assert_eq!(form.submitted_value(), Some("a:b::c"));
    assert!(form.is_submitted_valid().await.unwrap());
}

#[tokio::test]
async fn test_rendering_and_checking_in_one_request() {
    let session = SharedNonceMap::default();
    let manager = NoncesManager::new(MemoryStorage::with_map(session.clone()));
    let mut first = NonceForm::new("token", manager, FormInput::new());
    let issued = first.field_value().await.unwrap();

    // The submission renders the next nonce while consuming the old one.
    let manager = NoncesManager::new(MemoryStorage::with_map(session.clone()));
    let body = format!("token={}", issued.replace(':', "%3A"));
    let mut second = NonceForm::new("token", manager, FormInput::from_body(body.as_bytes()));

    assert!(second.is_submitted_valid().await.unwrap());
    let next = second.field_value().await.unwrap();
    assert_ne!(next, issued);

    let map = session.read().await;
    assert_eq!(map.len(), 1);
    assert!(map.contains_key(next.split_once(':').unwrap().0));
}

#[tokio::test]
async fn test_json_body_submission() {
    let session = SharedNonceMap::default();
    let manager = NoncesManager::new(MemoryStorage::with_map(session.clone()));
    let token = manager.create(Some("checkout"), None).await.unwrap();

    let body = format!(r#"{{"token": "checkout:{}", "qty": 2}}"#, token.value());
    let mut form = NonceForm::new("token", manager, FormInput::from_body(body.as_bytes()));
    assert!(form.is_submitted_valid().await.unwrap());
    assert!(session.read().await.is_empty());
}

#[tokio::test]
async fn test_corrupted_entry_is_not_memoized() {
    use nonceward_cache::CacheStore;

    let cache = Arc::new(InMemoryCache::new());
    cache
        .set_json("nonce:x", "not a token".to_string(), None)
        .await
        .unwrap();

    let mut form = submission(&cache, "x:y");
    let err = form.is_submitted_valid().await.unwrap_err();
    assert!(err.is_corrupted_entry());

    // the entry is untouched, so asking again reports it again
    assert_eq!(
        cache.get_json("nonce:x").await.unwrap(),
        Some("not a token".to_string())
    );
    let err = form.is_submitted_valid().await.unwrap_err();
    assert!(err.is_corrupted_entry());
    assert!(form.is_submitted_invalid().await.is_err());
}
