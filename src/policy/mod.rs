//! Cache-control negotiation policy.
//!
//! Two header rewrites applied to every exchange the client performs:
//!
//! - Requests without an explicit freshness requirement are made to
//!   tolerate a stored response up to 365 days stale, so that a stale
//!   cached answer beats no answer when the network is down.
//! - Responses the origin marks `no-store` are downgraded to "store, but
//!   revalidate before every reuse" by appending `max-age=0`, keeping the
//!   body available for conditional-GET revalidation.
//!
//! The rewrites run at the network layer, below the cache-storage
//! decision, so the headers persisted to disk are the rewritten ones.

mod directives;

pub use directives::CacheControl;

use crate::client::{ExchangeTransform, HttpResponse};
use http::header::{HeaderMap, HeaderValue, CACHE_CONTROL};

/// Staleness tolerance applied to requests with no declared max-age:
/// 365 days, in seconds.
pub const MAX_STALE_SECS: u64 = 365 * 24 * 60 * 60;

static MAX_STALE_VALUE: HeaderValue = HeaderValue::from_static("max-stale=31536000");
static REVALIDATE_VALUE: HeaderValue = HeaderValue::from_static("max-age=0");

/// Rewrite a request's cache-control unless the caller declared an
/// explicit freshness requirement.
///
/// A declared `max-age` (including `max-age=0`) is an intentional choice
/// and passes through untouched. Anything else is replaced with a
/// directive tolerating a response up to [`MAX_STALE_SECS`] stale.
///
/// Note the check is on max-age, not max-stale: a request already carrying
/// max-stale but no max-age is rewritten again. Harmless, since the
/// replacement is identical, but deliberate fidelity to the negotiation
/// rule rather than an oversight fix.
pub fn normalize_request_headers(headers: &mut HeaderMap) {
    if CacheControl::from_headers(headers).max_age.is_some() {
        return;
    }

    // Prefer a stale response over no response
    headers.insert(CACHE_CONTROL, MAX_STALE_VALUE.clone());
}

/// Rewrite a response's cache-control if the origin forbids storage.
///
/// `no-store` is downgraded by appending `max-age=0` alongside it: the
/// cache may keep the body, but every reuse must revalidate with the
/// origin first. Responses that are non-cacheable for other reasons
/// (`private`, `no-cache`) pass through verbatim.
pub fn normalize_response_headers(headers: &mut HeaderMap) {
    if !CacheControl::from_headers(headers).no_store {
        return;
    }

    // Allow caching, but check with the origin server
    // for validation before using the cached copy
    headers.append(CACHE_CONTROL, REVALIDATE_VALUE.clone());
}

/// [`normalize_request_headers`] as a whole-request transform. Method,
/// URI, and body are untouched.
pub fn normalize_request<B>(request: http::Request<B>) -> http::Request<B> {
    let (mut parts, body) = request.into_parts();
    normalize_request_headers(&mut parts.headers);
    http::Request::from_parts(parts, body)
}

/// [`normalize_response_headers`] as a whole-response transform. Status
/// and body are untouched.
pub fn normalize_response<B>(response: http::Response<B>) -> http::Response<B> {
    let (mut parts, body) = response.into_parts();
    normalize_response_headers(&mut parts.headers);
    http::Response::from_parts(parts, body)
}

/// The policy filter as a pipeline transform, applied on every exchange
/// made by [`crate::HttpClient`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CacheControlPolicy;

impl ExchangeTransform for CacheControlPolicy {
    fn on_request(&self, request: &mut reqwest::Request) {
        normalize_request_headers(request.headers_mut());
    }

    fn on_response(&self, response: &mut HttpResponse) {
        normalize_response_headers(response.headers_mut());
    }
}
