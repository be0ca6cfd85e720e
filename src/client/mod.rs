// Shared HTTP client assembly and the per-exchange pipeline

mod response;
mod transform;

pub use response::{HttpResponse, ResponseSource};
pub use transform::{ExchangeTrace, ExchangeTransform};

use crate::cache::{CacheEntry, CacheStats, DiskCache};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::policy::{CacheControl, CacheControlPolicy};
use http::header::{HeaderValue, IF_NONE_MATCH};
use http::{Method, StatusCode};
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Shared HTTP client with cache-control normalization and an optional
/// disk-backed response cache.
///
/// Constructed once from [`Settings`] by the application's startup path
/// and handed to consumers; cloning is cheap and clones share the
/// connection pool and cache.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    transforms: Vec<Arc<dyn ExchangeTransform>>,
    cache: Option<DiskCache>,
}

impl HttpClient {
    /// Build a client from settings.
    ///
    /// The transform pipeline always carries the cache-control policy;
    /// exchange tracing is appended when enabled. Caching is active only
    /// when a storage directory is configured.
    pub fn new(settings: &Settings) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(settings.http.connect_timeout_seconds))
            .read_timeout(Duration::from_secs(settings.http.read_timeout_seconds))
            .pool_max_idle_per_host(settings.http.pool_max_idle_per_host)
            .tcp_keepalive(Some(Duration::from_secs(settings.http.tcp_keepalive_seconds)))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .build()?;

        let mut transforms: Vec<Arc<dyn ExchangeTransform>> = Vec::new();
        if settings.logging.log_exchanges {
            transforms.push(Arc::new(ExchangeTrace));
        }
        transforms.push(Arc::new(CacheControlPolicy));

        let cache = settings.cache.directory.as_ref().map(|dir| {
            let dir = dir.join("http_cache");
            debug!("HTTP cache enabled at {}", dir.display());
            DiskCache::new(dir, settings.cache.max_size_bytes)
        });

        Ok(Self {
            inner,
            transforms,
            cache,
        })
    }

    /// Append a transform to the end of the pipeline.
    pub fn with_transform(mut self, transform: Arc<dyn ExchangeTransform>) -> Self {
        self.transforms.push(transform);
        self
    }

    /// The underlying `reqwest` client, for exchanges that must bypass
    /// the pipeline.
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }

    /// Convenience GET through the full pipeline.
    pub async fn get(&self, url: &str) -> Result<HttpResponse> {
        let url = Url::parse(url).map_err(|err| Error::InvalidUrl(err.to_string()))?;
        self.execute(reqwest::Request::new(Method::GET, url)).await
    }

    /// Run a request through the pipeline: transforms, cache lookup,
    /// network, revalidation, storage.
    pub async fn execute(&self, mut request: reqwest::Request) -> Result<HttpResponse> {
        for transform in &self.transforms {
            transform.on_request(&mut request);
        }

        // Only GETs participate in caching.
        let cache = self
            .cache
            .as_ref()
            .filter(|_| request.method() == Method::GET);

        if let Some(cache) = cache {
            let request_control = CacheControl::from_headers(request.headers());
            if let Some((entry, body)) = cache.lookup(request.url().as_str()).await {
                return self
                    .serve_with_entry(request, cache, request_control, entry, body)
                    .await;
            }
            cache.mark_miss().await;
        }

        let response = self.inner.execute(request).await?;
        self.complete_network(response, cache).await
    }

    /// Evict every cached response.
    ///
    /// Eviction failures are logged and swallowed: caching is a
    /// performance optimization, and a failed cleanup must never surface
    /// to the caller. A no-op when no storage directory was configured.
    pub async fn invalidate_cache(&self) {
        if let Some(cache) = &self.cache {
            if let Err(err) = cache.evict_all().await {
                error!("Failed to evict HTTP cache: {}", err);
            }
        }
    }

    /// Cache statistics, when caching is configured.
    pub async fn cache_stats(&self) -> Option<CacheStats> {
        match &self.cache {
            Some(cache) => Some(cache.stats().await),
            None => None,
        }
    }

    /// Decide between serving, revalidating, and refetching a stored entry.
    async fn serve_with_entry(
        &self,
        mut request: reqwest::Request,
        cache: &DiskCache,
        request_control: CacheControl,
        mut entry: CacheEntry,
        body: bytes::Bytes,
    ) -> Result<HttpResponse> {
        let entry_control = entry.cache_control();
        let age = entry.age_secs();
        let lifetime = entry_control.max_age.unwrap_or(0);

        // Strict bound: a max-age=0 entry is never fresh, always revalidated.
        let fresh = age < lifetime
            && request_control.max_age.map_or(true, |limit| age <= limit)
            && !entry_control.no_cache
            && !request_control.no_cache;

        if fresh {
            debug!("Cache hit for {} (age {}s)", entry.url, age);
            cache.mark_hit().await;
            return HttpResponse::from_entry(&entry, body, ResponseSource::Cache);
        }

        // Stale: go to the origin, conditionally when an etag exists.
        if let Some(etag) = entry.etag.as_deref() {
            if let Ok(value) = HeaderValue::from_str(etag) {
                request.headers_mut().insert(IF_NONE_MATCH, value);
            }
        }

        match self.inner.execute(request).await {
            Ok(response) if response.status() == StatusCode::NOT_MODIFIED => {
                debug!("Revalidated {} (age {}s)", entry.url, age);
                cache.mark_hit().await;
                cache.touch(&mut entry).await;
                HttpResponse::from_entry(&entry, body, ResponseSource::Revalidated)
            }
            Ok(response) => {
                cache.mark_miss().await;
                self.complete_network(response, Some(cache)).await
            }
            Err(err) => {
                // Prefer a stale response over no response, within the
                // request's declared staleness tolerance.
                let stale_budget = lifetime.saturating_add(request_control.max_stale.unwrap_or(0));
                if age <= stale_budget && !entry_control.must_revalidate {
                    warn!("Network failed for {}, serving stale (age {}s): {}", entry.url, age, err);
                    cache.mark_hit().await;
                    return HttpResponse::from_entry(&entry, body, ResponseSource::Cache);
                }
                Err(err.into())
            }
        }
    }

    /// Buffer a network response, run response transforms, and store the
    /// result when the rewritten directives permit it.
    async fn complete_network(
        &self,
        response: reqwest::Response,
        cache: Option<&DiskCache>,
    ) -> Result<HttpResponse> {
        let mut response = HttpResponse::from_network(response).await?;
        for transform in &self.transforms {
            transform.on_response(&mut response);
        }

        if let Some(cache) = cache {
            let control = CacheControl::from_headers(response.headers());
            if response.status().is_success() && control.permits_storage() {
                let entry = CacheEntry::new(
                    response.url().as_str(),
                    response.status(),
                    response.headers(),
                    response.body().len() as u64,
                );
                if let Err(err) = cache.store(&entry, response.body()).await {
                    // Storage failure costs a refetch later, nothing more.
                    warn!("Failed to store response for {}: {}", response.url(), err);
                }
            }
        }

        Ok(response)
    }
}
