//! Exchange transforms: the client's interceptor seam.

use crate::client::HttpResponse;
use tracing::debug;

/// A hook applied to every exchange, at the point closest to the network:
/// after the caller hands off the request and before transmission, then
/// after the response arrives and before the cache-storage decision.
///
/// Transforms run in the order they were composed into the client and may
/// only annotate headers; rewriting method, body, or status breaks the
/// exchange semantics the rest of the pipeline relies on.
pub trait ExchangeTransform: Send + Sync {
    fn on_request(&self, request: &mut reqwest::Request) {
        let _ = request;
    }

    fn on_response(&self, response: &mut HttpResponse) {
        let _ = response;
    }
}

/// Debug logging for exchanges: request line out, status and size back.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExchangeTrace;

impl ExchangeTransform for ExchangeTrace {
    fn on_request(&self, request: &mut reqwest::Request) {
        debug!("--> {} {}", request.method(), request.url());
    }

    fn on_response(&self, response: &mut HttpResponse) {
        debug!(
            "<-- {} {} ({} bytes)",
            response.status().as_u16(),
            response.url(),
            response.body().len()
        );
    }
}
