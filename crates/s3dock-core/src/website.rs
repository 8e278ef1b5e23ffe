//! Static-website configuration and routing decisions.

use dashmap::DashMap;
use s3dock_model::types::WebsiteConfiguration;

/// Per-bucket website configurations with a server-wide fallback.
///
/// The fallback comes from the `index_document`/`error_document` options
/// and turns every bucket into a website.
#[derive(Debug, Default)]
pub struct WebsiteIndex {
    per_bucket: DashMap<String, WebsiteConfiguration>,
    fallback: Option<WebsiteConfiguration>,
}

impl WebsiteIndex {
    /// Create an index with an optional server-wide configuration.
    #[must_use]
    pub fn new(fallback: Option<WebsiteConfiguration>) -> Self {
        Self {
            per_bucket: DashMap::new(),
            fallback,
        }
    }

    /// Replace the configuration for a bucket.
    pub fn set(&self, bucket: &str, configuration: WebsiteConfiguration) {
        self.per_bucket.insert(bucket.to_owned(), configuration);
    }

    /// Remove a bucket's configuration; the fallback applies afterwards.
    pub fn delete(&self, bucket: &str) {
        self.per_bucket.remove(bucket);
    }

    /// A clone of the bucket's own configuration (never the fallback).
    #[must_use]
    pub fn get(&self, bucket: &str) -> Option<WebsiteConfiguration> {
        self.per_bucket.get(bucket).map(|c| c.value().clone())
    }

    /// The effective configuration for a bucket, falling back to the
    /// server-wide one. `None` means the bucket is not a website.
    #[must_use]
    pub fn effective(&self, bucket: &str) -> Option<WebsiteConfiguration> {
        self.per_bucket
            .get(bucket)
            .map(|c| c.value().clone())
            .or_else(|| self.fallback.clone())
    }
}

/// Resolve the index-document key for a website GET.
///
/// A key of `""` (bucket root) or one ending in `/` is a directory-style
/// request: the index document is appended. Anything else is first tried
/// verbatim by the caller; this helper only names the fallback lookup.
#[must_use]
pub fn index_key(key: &str, index_document: &str) -> String {
    if key.is_empty() {
        index_document.to_owned()
    } else if key.ends_with('/') {
        format!("{key}{index_document}")
    } else {
        format!("{key}/{index_document}")
    }
}

/// The built-in 404 page used when no error document is configured.
#[must_use]
pub fn default_error_page(bucket: &str, key: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>404 Not Found</title></head>\n\
         <body>\n<h1>404 Not Found</h1>\n<ul>\n<li>Code: NoSuchKey</li>\n\
         <li>Message: The specified key does not exist.</li>\n\
         <li>Key: {key}</li>\n<li>BucketName: {bucket}</li>\n</ul>\n</body>\n</html>\n"
    )
}
