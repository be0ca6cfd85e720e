//! Structured view of the HTTP `Cache-Control` header.
//!
//! Only the directives the client actually negotiates on are modeled;
//! everything else passes through the raw header map untouched.

use http::header::{HeaderMap, CACHE_CONTROL};

/// Parsed `Cache-Control` directives for a single request or response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheControl {
    /// Freshness lifetime in seconds (`max-age=N`).
    pub max_age: Option<u64>,
    /// Staleness tolerance in seconds (`max-stale=N`, request only).
    pub max_stale: Option<u64>,
    /// `no-store`: the origin forbids persisting the response.
    pub no_store: bool,
    /// `no-cache`: a stored copy must be revalidated before reuse.
    pub no_cache: bool,
    /// `must-revalidate`: a stale stored copy must not be served.
    pub must_revalidate: bool,
}

impl CacheControl {
    /// Parse a single `Cache-Control` header value.
    pub fn parse(header: &str) -> Self {
        let mut control = Self::default();
        control.merge(header);
        control
    }

    /// Combine every `Cache-Control` value present in a header map.
    ///
    /// Responses rewritten by the policy filter carry two values
    /// (the origin's and the appended one), so all of them count.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut control = Self::default();
        for value in headers.get_all(CACHE_CONTROL) {
            if let Ok(text) = value.to_str() {
                control.merge(text);
            }
        }
        control
    }

    fn merge(&mut self, header: &str) {
        for directive in header.split(',') {
            let directive = directive.trim().to_ascii_lowercase();

            match directive.as_str() {
                "no-store" => self.no_store = true,
                "no-cache" => self.no_cache = true,
                "must-revalidate" => self.must_revalidate = true,
                _ => {
                    if let Some(seconds) = directive.strip_prefix("max-age=") {
                        // Negative or malformed values fail the parse and are
                        // treated as undeclared.
                        if let Ok(seconds) = seconds.parse::<u64>() {
                            self.max_age = Some(seconds);
                        }
                    } else if let Some(seconds) = directive.strip_prefix("max-stale=") {
                        if let Ok(seconds) = seconds.parse::<u64>() {
                            self.max_stale = Some(seconds);
                        }
                    }
                }
            }
        }
    }

    /// Whether a cache may persist a response carrying these directives.
    ///
    /// `no-store` normally vetoes storage, but the policy filter downgrades
    /// it by appending `max-age=0`; a no-store response accompanied by a
    /// max-age is therefore stored and revalidated on every reuse.
    pub fn permits_storage(&self) -> bool {
        !self.no_store || self.max_age.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::HeaderValue;

    #[test]
    fn test_parse_flags_and_values() {
        let control = CacheControl::parse("no-store, max-age=60, must-revalidate");
        assert!(control.no_store);
        assert!(control.must_revalidate);
        assert_eq!(control.max_age, Some(60));
        assert_eq!(control.max_stale, None);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let control = CacheControl::parse("No-Store, Max-Age=5");
        assert!(control.no_store);
        assert_eq!(control.max_age, Some(5));
    }

    #[test]
    fn test_negative_max_age_is_undeclared() {
        let control = CacheControl::parse("max-age=-1");
        assert_eq!(control.max_age, None);
    }

    #[test]
    fn test_from_headers_combines_all_values() {
        let mut headers = HeaderMap::new();
        headers.append(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        headers.append(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));

        let control = CacheControl::from_headers(&headers);
        assert!(control.no_store);
        assert_eq!(control.max_age, Some(0));
    }

    #[test]
    fn test_storage_veto() {
        assert!(!CacheControl::parse("no-store").permits_storage());
        assert!(CacheControl::parse("no-store, max-age=0").permits_storage());
        assert!(CacheControl::parse("private").permits_storage());
    }
}
