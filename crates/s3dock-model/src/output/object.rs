//! Output records for object-level operations.

use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::types::{DeleteError, DeletedObject};

/// Header-carried object attributes shared by GetObject and HeadObject.
#[derive(Debug, Clone, Default)]
pub struct ObjectHeaders {
    /// Quoted hex MD5 etag.
    pub etag: String,
    /// Last modification instant, rendered RFC 1123 on the wire.
    pub last_modified: Option<DateTime<Utc>>,
    /// The stored content type.
    pub content_type: String,
    /// The byte length reported in `Content-Length`.
    pub content_length: u64,
    /// Pass-through `Content-Encoding`.
    pub content_encoding: Option<String>,
    /// Pass-through `Content-Disposition`.
    pub content_disposition: Option<String>,
    /// Pass-through `Cache-Control`.
    pub cache_control: Option<String>,
    /// Pass-through `Expires`.
    pub expires: Option<String>,
    /// User metadata, rendered as `x-amz-meta-*` headers.
    pub metadata: HashMap<String, String>,
}

/// Output of the GetObject operation.
#[derive(Debug, Clone, Default)]
pub struct GetObjectOutput {
    /// Object attribute headers. `content_length` reflects the body below,
    /// which may be a range slice of the stored blob.
    pub headers: ObjectHeaders,
    /// The (possibly range-sliced) content.
    pub body: Bytes,
    /// `Content-Range` value; presence selects a 206 response.
    pub content_range: Option<String>,
}

/// Output of the HeadObject operation.
#[derive(Debug, Clone, Default)]
pub struct HeadObjectOutput {
    /// Object attribute headers.
    pub headers: ObjectHeaders,
    /// `Content-Range` value; presence selects a 206 response.
    pub content_range: Option<String>,
}

/// Output of the PutObject operation.
#[derive(Debug, Clone)]
pub struct PutObjectOutput {
    /// Quoted hex MD5 etag of the stored content.
    pub etag: String,
}

/// Output of the CopyObject operation, rendered as `CopyObjectResult`.
#[derive(Debug, Clone)]
pub struct CopyObjectOutput {
    /// Quoted hex MD5 etag of the destination content.
    pub etag: String,
    /// Last-modified instant of the destination.
    pub last_modified: DateTime<Utc>,
}

/// Output of the DeleteObjects operation, rendered as `DeleteResult`.
#[derive(Debug, Clone, Default)]
pub struct DeleteObjectsOutput {
    /// Every requested key, present or not, unless quiet mode was set.
    pub deleted: Vec<DeletedObject>,
    /// Keys that failed with a real I/O error.
    pub errors: Vec<DeleteError>,
}

/// Output of a website-mode GET: an index document, a stored error
/// document, or the built-in 404 page.
#[derive(Debug, Clone)]
pub struct WebsiteObjectOutput {
    /// 200 for index documents, 404 for error pages.
    pub status: http::StatusCode,
    /// The content type of the served document.
    pub content_type: String,
    /// The document body.
    pub body: Bytes,
}
