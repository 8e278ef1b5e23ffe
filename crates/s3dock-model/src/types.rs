//! Shared wire types appearing inside XML payloads and listing results.

use chrono::{DateTime, Utc};

/// Directive controlling metadata handling on a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetadataDirective {
    /// Metadata and system headers are copied from the source object.
    #[default]
    Copy,
    /// Metadata and system headers are taken from the copy request itself.
    Replace,
}

impl MetadataDirective {
    /// Parse the `x-amz-metadata-directive` header value.
    ///
    /// Unknown values fall back to `Copy`, matching the upstream default.
    #[must_use]
    pub fn from_header(value: &str) -> Self {
        if value.eq_ignore_ascii_case("REPLACE") {
            Self::Replace
        } else {
            Self::Copy
        }
    }
}

/// A single CORS configuration rule.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CorsRule {
    /// Origin patterns; `*` inside a pattern matches any character sequence.
    pub allowed_origins: Vec<String>,
    /// HTTP methods the rule allows (e.g. `GET`, `PUT`).
    pub allowed_methods: Vec<String>,
    /// Request-header patterns the rule allows; supports `*` globs.
    pub allowed_headers: Vec<String>,
    /// Response headers the browser may read.
    pub expose_headers: Vec<String>,
    /// How long (seconds) the browser may cache a preflight result.
    pub max_age_seconds: Option<i32>,
}

/// A `CORSConfiguration` document: an ordered list of rules.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CorsConfiguration {
    /// Rules in document order; the first match wins.
    pub rules: Vec<CorsRule>,
}

/// A `WebsiteConfiguration` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteConfiguration {
    /// The index document served for directory-style requests.
    pub index_document: String,
    /// Optional error document served for missing keys.
    pub error_document: Option<String>,
}

/// One key named in a bulk-delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectIdentifier {
    /// The object key to delete.
    pub key: String,
}

/// A `Delete` document from a `POST /<bucket>?delete` request body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delete {
    /// The keys to delete.
    pub objects: Vec<ObjectIdentifier>,
    /// Quiet mode suppresses per-key success entries in the response.
    pub quiet: bool,
}

/// One part reference in a `CompleteMultipartUpload` request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedPart {
    /// The 1-based part number.
    pub part_number: u32,
    /// The etag the client observed when uploading the part.
    pub etag: Option<String>,
}

/// A `CompleteMultipartUpload` document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletedMultipartUpload {
    /// Parts in request order; must be ascending by part number.
    pub parts: Vec<CompletedPart>,
}

/// A bucket entry in a `ListAllMyBucketsResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketEntry {
    /// The bucket name.
    pub name: String,
    /// When the bucket directory was created.
    pub creation_date: DateTime<Utc>,
}

/// An object entry in a `ListBucketResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    /// The full object key.
    pub key: String,
    /// Last modification instant.
    pub last_modified: DateTime<Utc>,
    /// Quoted hex MD5 etag.
    pub etag: String,
    /// Object size in bytes.
    pub size: u64,
}

/// A per-key success entry in a `DeleteResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedObject {
    /// The key that was (or already wasn't) present.
    pub key: String,
}

/// A per-key failure entry in a `DeleteResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteError {
    /// The key that failed to delete.
    pub key: String,
    /// The error code.
    pub code: String,
    /// The error message.
    pub message: String,
}
