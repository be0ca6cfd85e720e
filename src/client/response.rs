//! Buffered response type returned by the client.
//!
//! Responses are fully buffered so they can be handed to transforms,
//! persisted to disk, and replayed from the cache with one shape.

use crate::cache::CacheEntry;
use crate::error::{Error, Result};
use bytes::Bytes;
use http::header::HeaderMap;
use http::StatusCode;
use reqwest::Url;
use serde::de::DeserializeOwned;

/// Where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    /// Fetched from the origin on this exchange.
    Network,
    /// Served from the disk cache without contacting the origin.
    Cache,
    /// Served from the disk cache after a 304 from the origin.
    Revalidated,
}

/// A completed HTTP exchange: status, headers, and buffered body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    url: Url,
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    source: ResponseSource,
}

impl HttpResponse {
    /// Buffer a network response.
    pub(crate) async fn from_network(response: reqwest::Response) -> Result<Self> {
        let url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(Self {
            url,
            status,
            headers,
            body,
            source: ResponseSource::Network,
        })
    }

    /// Replay a stored cache entry.
    pub(crate) fn from_entry(
        entry: &CacheEntry,
        body: Bytes,
        source: ResponseSource,
    ) -> Result<Self> {
        let url = Url::parse(&entry.url)
            .map_err(|err| Error::Cache(format!("stored URL unparseable: {}", err)))?;
        let status = StatusCode::from_u16(entry.status)
            .map_err(|_| Error::Cache(format!("stored status invalid: {}", entry.status)))?;

        Ok(Self {
            url,
            status,
            headers: entry.header_map(),
            body,
            source,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Where this response was served from.
    pub fn source(&self) -> ResponseSource {
        self.source
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}
