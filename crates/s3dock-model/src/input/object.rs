//! Input records for object-level operations.

use std::collections::HashMap;

use bytes::Bytes;

use crate::types::{Delete, MetadataDirective};

/// Input for the PutObject operation.
#[derive(Debug, Clone, Default)]
pub struct PutObjectInput {
    /// The destination bucket.
    pub bucket: String,
    /// The destination key.
    pub key: String,
    /// The object content.
    pub body: Bytes,
    /// The declared `Content-Type`.
    pub content_type: Option<String>,
    /// Base64 MD5 digest to verify against, from `Content-MD5`.
    pub content_md5: Option<String>,
    /// Pass-through `Content-Encoding`.
    pub content_encoding: Option<String>,
    /// Pass-through `Content-Disposition`.
    pub content_disposition: Option<String>,
    /// Pass-through `Cache-Control`.
    pub cache_control: Option<String>,
    /// Pass-through `Expires`.
    pub expires: Option<String>,
    /// User metadata from `x-amz-meta-*` headers, keys lowercased.
    pub metadata: HashMap<String, String>,
}

/// Input for the GetObject operation.
#[derive(Debug, Clone)]
pub struct GetObjectInput {
    /// The bucket holding the object.
    pub bucket: String,
    /// The object key.
    pub key: String,
    /// Raw `Range` header value, if present.
    pub range: Option<String>,
}

/// Input for the HeadObject operation.
#[derive(Debug, Clone)]
pub struct HeadObjectInput {
    /// The bucket holding the object.
    pub bucket: String,
    /// The object key.
    pub key: String,
    /// Raw `Range` header value, if present.
    pub range: Option<String>,
}

/// Input for the CopyObject operation.
#[derive(Debug, Clone)]
pub struct CopyObjectInput {
    /// The destination bucket.
    pub bucket: String,
    /// The destination key.
    pub key: String,
    /// Raw `x-amz-copy-source` header value (percent-encoded).
    pub copy_source: String,
    /// `COPY` (default) or `REPLACE`.
    pub metadata_directive: MetadataDirective,
    /// Content type for a `REPLACE` copy.
    pub content_type: Option<String>,
    /// Replacement metadata for a `REPLACE` copy.
    pub metadata: HashMap<String, String>,
}

/// Input for the DeleteObject operation.
#[derive(Debug, Clone)]
pub struct DeleteObjectInput {
    /// The bucket holding the object.
    pub bucket: String,
    /// The object key.
    pub key: String,
}

/// Input for the DeleteObjects (bulk delete) operation.
#[derive(Debug, Clone)]
pub struct DeleteObjectsInput {
    /// The bucket holding the objects.
    pub bucket: String,
    /// The parsed `Delete` document.
    pub delete: Delete,
}
