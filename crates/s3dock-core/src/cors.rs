//! CORS configuration index and rule matching.
//!
//! Buckets carry an ordered rule list set through `PutBucketCors`; a
//! server-wide configuration (from the `cors` option) applies to buckets
//! without one. Matching walks rules in document order and the first match
//! wins. Origin and header patterns support `*` as a glob matching any
//! character sequence.

use dashmap::DashMap;
use s3dock_model::output::PreflightAllow;
use s3dock_model::types::{CorsConfiguration, CorsRule};

/// Headers appended to `access-control-expose-headers` on range responses.
pub const RANGE_EXPOSE_HEADERS: &str = "Accept-Ranges, Content-Range";

/// The result of matching a normal (non-preflight) request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsMatch {
    /// Value for `access-control-allow-origin`: the request origin for
    /// non-wildcard rules, `*` otherwise.
    pub allow_origin: String,
    /// Comma-joined literal expose headers, empty when none configured.
    pub expose_headers: Vec<String>,
}

/// Thread-safe per-bucket CORS state with a server-wide fallback.
#[derive(Debug, Default)]
pub struct CorsIndex {
    per_bucket: DashMap<String, CorsConfiguration>,
    fallback: Option<CorsConfiguration>,
}

impl CorsIndex {
    /// Create an index with an optional server-wide fallback configuration.
    ///
    /// `None` disables CORS for buckets without their own configuration:
    /// preflights fail with 403 and responses carry no CORS headers.
    #[must_use]
    pub fn new(fallback: Option<CorsConfiguration>) -> Self {
        Self {
            per_bucket: DashMap::new(),
            fallback,
        }
    }

    /// The permissive wildcard configuration used when no `cors` option is
    /// given: every origin, the common methods, every header.
    #[must_use]
    pub fn wildcard_configuration() -> CorsConfiguration {
        CorsConfiguration {
            rules: vec![CorsRule {
                allowed_origins: vec!["*".to_owned()],
                allowed_methods: ["GET", "PUT", "POST", "DELETE", "HEAD"]
                    .into_iter()
                    .map(ToOwned::to_owned)
                    .collect(),
                allowed_headers: vec!["*".to_owned()],
                expose_headers: Vec::new(),
                max_age_seconds: None,
            }],
        }
    }

    /// Replace the configuration for a bucket.
    pub fn set(&self, bucket: &str, configuration: CorsConfiguration) {
        self.per_bucket.insert(bucket.to_owned(), configuration);
    }

    /// Remove a bucket's configuration; the fallback applies afterwards.
    pub fn delete(&self, bucket: &str) {
        self.per_bucket.remove(bucket);
    }

    /// A clone of the bucket's own configuration (never the fallback).
    #[must_use]
    pub fn get(&self, bucket: &str) -> Option<CorsConfiguration> {
        self.per_bucket.get(bucket).map(|c| c.value().clone())
    }

    /// Match a normal request's origin and method.
    #[must_use]
    pub fn match_request(&self, bucket: &str, origin: &str, method: &str) -> Option<CorsMatch> {
        self.with_rules(bucket, |rules| {
            rules
                .iter()
                .find(|rule| rule.matches_origin(origin) && rule.matches_method(method))
                .map(|rule| CorsMatch {
                    allow_origin: rule.resolve_allow_origin(origin),
                    expose_headers: rule.expose_headers.clone(),
                })
        })
    }

    /// Evaluate a preflight. `None` means "deny with an empty 403".
    #[must_use]
    pub fn match_preflight(
        &self,
        bucket: &str,
        origin: &str,
        request_method: &str,
        request_headers: &[String],
    ) -> Option<PreflightAllow> {
        self.with_rules(bucket, |rules| {
            rules
                .iter()
                .find(|rule| {
                    rule.matches_origin(origin)
                        && rule.matches_method(request_method)
                        && rule.allows_headers(request_headers)
                })
                .map(|rule| PreflightAllow {
                    origin: rule.resolve_allow_origin(origin),
                    methods: rule.allowed_methods.clone(),
                    headers: request_headers
                        .iter()
                        .map(|h| h.to_ascii_lowercase())
                        .collect(),
                    max_age_seconds: rule.max_age_seconds,
                })
        })
    }

    /// Run `f` over the effective rule list for `bucket`, if any.
    fn with_rules<T>(&self, bucket: &str, f: impl FnOnce(&[CorsRule]) -> Option<T>) -> Option<T> {
        if let Some(config) = self.per_bucket.get(bucket) {
            return f(&config.value().rules);
        }
        self.fallback.as_ref().and_then(|config| f(&config.rules))
    }
}

/// Rule-level matching helpers.
trait RuleMatch {
    fn matches_origin(&self, origin: &str) -> bool;
    fn matches_method(&self, method: &str) -> bool;
    fn allows_headers(&self, requested: &[String]) -> bool;
    fn resolve_allow_origin(&self, origin: &str) -> String;
}

impl RuleMatch for CorsRule {
    fn matches_origin(&self, origin: &str) -> bool {
        self.allowed_origins
            .iter()
            .any(|pattern| wildcard_match(pattern, origin))
    }

    fn matches_method(&self, method: &str) -> bool {
        self.allowed_methods
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method))
    }

    fn allows_headers(&self, requested: &[String]) -> bool {
        requested.iter().all(|header| {
            self.allowed_headers
                .iter()
                .any(|pattern| wildcard_match_ignore_case(pattern, header))
        })
    }

    fn resolve_allow_origin(&self, origin: &str) -> String {
        if self.allowed_origins.iter().any(|o| o == "*") {
            "*".to_owned()
        } else {
            origin.to_owned()
        }
    }
}

/// Glob match where `*` in the pattern matches any character sequence.
#[must_use]
pub fn wildcard_match(pattern: &str, value: &str) -> bool {
    glob_match(pattern.as_bytes(), value.as_bytes())
}

/// Case-insensitive variant used for header names.
fn wildcard_match_ignore_case(pattern: &str, value: &str) -> bool {
    glob_match(
        pattern.to_ascii_lowercase().as_bytes(),
        value.to_ascii_lowercase().as_bytes(),
    )
}

/// Iterative glob matcher over bytes; only `*` is special.
fn glob_match(pattern: &[u8], value: &[u8]) -> bool {
    let (mut p, mut v) = (0_usize, 0_usize);
    let mut star: Option<(usize, usize)> = None;

    while v < value.len() {
        if p < pattern.len() && (pattern[p] == value[v]) {
            p += 1;
            v += 1;
        } else if p < pattern.len() && pattern[p] == b'*' {
            star = Some((p, v));
            p += 1;
        } else if let Some((star_p, star_v)) = star {
            p = star_p + 1;
            v = star_v + 1;
            star = Some((star_p, star_v + 1));
        } else {
            return false;
        }
    }
    while p < pattern.len() && pattern[p] == b'*' {
        p += 1;
    }
    p == pattern.len()
}
