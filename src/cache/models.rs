//! Cached entry metadata and cache statistics.

use crate::policy::CacheControl;
use http::header::{HeaderMap, HeaderName, HeaderValue, CACHE_CONTROL, ETAG};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Metadata persisted alongside a cached response body.
///
/// Headers are stored as a list of pairs rather than a map so that
/// duplicate values survive the round trip — a normalized no-store
/// response carries two `Cache-Control` values, and the freshness
/// decision on read-back needs both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub stored_at: SystemTime,
    pub etag: Option<String>,
    pub body_len: u64,
}

impl CacheEntry {
    /// Capture entry metadata from a network response.
    pub fn new(url: &str, status: StatusCode, headers: &HeaderMap, body_len: u64) -> Self {
        let pairs = headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let etag = headers
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        Self {
            url: url.to_string(),
            status: status.as_u16(),
            headers: pairs,
            stored_at: SystemTime::now(),
            etag,
            body_len,
        }
    }

    /// Seconds elapsed since the entry was stored (or last revalidated).
    pub fn age_secs(&self) -> u64 {
        self.stored_at.elapsed().unwrap_or_default().as_secs()
    }

    /// Combined cache-control directives of the stored response.
    pub fn cache_control(&self) -> CacheControl {
        let combined = self
            .headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(CACHE_CONTROL.as_str()))
            .map(|(_, value)| value.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        CacheControl::parse(&combined)
    }

    /// Rebuild a header map from the stored pairs, preserving duplicates.
    /// Pairs that no longer parse as valid header names/values are skipped.
    pub fn header_map(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                map.append(name, value);
            }
        }
        map
    }
}

/// Statistics for cache operations.
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    /// Exchanges answered from disk (fresh hits, revalidations, and
    /// stale responses served on network failure).
    pub hits: u64,
    /// Exchanges that went to the network for a full response.
    pub misses: u64,
    /// Responses written to disk.
    pub stores: u64,
    /// Entries removed by size trimming or full eviction.
    pub evictions: u64,
}
