// Disk cache tests - testing only public APIs

use cachewise::cache::{CacheEntry, DiskCache};
use http::header::{HeaderMap, HeaderValue, CACHE_CONTROL};
use http::StatusCode;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;

fn entry_for(url: &str, cache_control: &[&str], body_len: u64) -> CacheEntry {
    let mut headers = HeaderMap::new();
    for value in cache_control {
        headers.append(CACHE_CONTROL, HeaderValue::from_str(value).unwrap());
    }
    CacheEntry::new(url, StatusCode::OK, &headers, body_len)
}

#[tokio::test]
async fn test_store_and_lookup_round_trip() {
    let dir = tempdir().unwrap();
    let cache = DiskCache::new(dir.path().join("http_cache"), 50 * 1024 * 1024);

    let entry = entry_for("https://example.com/a", &["no-store", "max-age=0"], 5);
    cache.store(&entry, b"hello").await.unwrap();

    let (stored, body) = cache.lookup("https://example.com/a").await.unwrap();
    assert_eq!(&body[..], b"hello");
    assert_eq!(stored.status, 200);

    // Duplicate cache-control values survive the round trip.
    let control = stored.cache_control();
    assert!(control.no_store);
    assert_eq!(control.max_age, Some(0));
}

#[tokio::test]
async fn test_lookup_miss_returns_none() {
    let dir = tempdir().unwrap();
    let cache = DiskCache::new(dir.path().join("http_cache"), 1024);

    assert!(cache.lookup("https://example.com/absent").await.is_none());
}

#[tokio::test]
async fn test_evict_all_removes_entries() {
    let dir = tempdir().unwrap();
    let cache = DiskCache::new(dir.path().join("http_cache"), 50 * 1024 * 1024);

    let entry = entry_for("https://example.com/a", &["max-age=60"], 4);
    cache.store(&entry, b"data").await.unwrap();
    assert!(cache.lookup("https://example.com/a").await.is_some());

    cache.evict_all().await.unwrap();
    assert!(cache.lookup("https://example.com/a").await.is_none());

    let stats = cache.stats().await;
    assert_eq!(stats.evictions, 1);
}

#[tokio::test]
async fn test_evict_all_without_storage_is_a_noop() {
    let dir = tempdir().unwrap();
    // Directory never created: nothing was ever stored.
    let cache = DiskCache::new(dir.path().join("never_created"), 1024);

    cache.evict_all().await.unwrap();
}

#[tokio::test]
async fn test_trim_removes_oldest_entries_beyond_size_limit() {
    let dir = tempdir().unwrap();
    // Small enough that two bodies plus metadata cannot both fit.
    let cache = DiskCache::new(dir.path().join("http_cache"), 2048);

    let mut old = entry_for("https://example.com/old", &["max-age=60"], 1500);
    old.stored_at = SystemTime::now() - Duration::from_secs(3600);
    cache.store(&old, &[0u8; 1500]).await.unwrap();

    let new = entry_for("https://example.com/new", &["max-age=60"], 1500);
    cache.store(&new, &[1u8; 1500]).await.unwrap();

    assert!(cache.lookup("https://example.com/old").await.is_none());
    assert!(cache.lookup("https://example.com/new").await.is_some());

    let stats = cache.stats().await;
    assert!(stats.evictions >= 1);
}

#[tokio::test]
async fn test_touch_resets_entry_age() {
    let dir = tempdir().unwrap();
    let cache = DiskCache::new(dir.path().join("http_cache"), 50 * 1024 * 1024);

    let mut entry = entry_for("https://example.com/a", &["max-age=60"], 4);
    entry.stored_at = SystemTime::now() - Duration::from_secs(3600);
    cache.store(&entry, b"data").await.unwrap();

    cache.touch(&mut entry).await;

    let (stored, _) = cache.lookup("https://example.com/a").await.unwrap();
    assert!(stored.age_secs() < 60);
}

#[tokio::test]
async fn test_stats_count_stores() {
    let dir = tempdir().unwrap();
    let cache = DiskCache::new(dir.path().join("http_cache"), 50 * 1024 * 1024);

    let entry = entry_for("https://example.com/a", &["max-age=60"], 2);
    cache.store(&entry, b"ab").await.unwrap();

    let stats = cache.stats().await;
    assert_eq!(stats.stores, 1);
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 0);
}
