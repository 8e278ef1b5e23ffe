//! Input records for multipart upload operations.

use std::collections::HashMap;

use bytes::Bytes;

use crate::types::CompletedMultipartUpload;

/// Input for the CreateMultipartUpload operation.
#[derive(Debug, Clone, Default)]
pub struct CreateMultipartUploadInput {
    /// The destination bucket.
    pub bucket: String,
    /// The destination key.
    pub key: String,
    /// The declared `Content-Type` for the final object.
    pub content_type: Option<String>,
    /// Pass-through `Content-Encoding`.
    pub content_encoding: Option<String>,
    /// Pass-through `Content-Disposition`.
    pub content_disposition: Option<String>,
    /// Pass-through `Cache-Control`.
    pub cache_control: Option<String>,
    /// Pass-through `Expires`.
    pub expires: Option<String>,
    /// User metadata for the final object, keys lowercased.
    pub metadata: HashMap<String, String>,
}

/// Input for the UploadPart operation.
#[derive(Debug, Clone)]
pub struct UploadPartInput {
    /// The destination bucket.
    pub bucket: String,
    /// The destination key.
    pub key: String,
    /// The upload this part belongs to.
    pub upload_id: String,
    /// The 1-based part number.
    pub part_number: u32,
    /// The part content.
    pub body: Bytes,
    /// Base64 MD5 digest to verify against, from `Content-MD5`.
    pub content_md5: Option<String>,
}

/// Input for the CompleteMultipartUpload operation.
#[derive(Debug, Clone)]
pub struct CompleteMultipartUploadInput {
    /// The destination bucket.
    pub bucket: String,
    /// The destination key.
    pub key: String,
    /// The upload to complete.
    pub upload_id: String,
    /// The parsed part list from the request body.
    pub multipart_upload: CompletedMultipartUpload,
}

/// Input for the AbortMultipartUpload operation.
#[derive(Debug, Clone)]
pub struct AbortMultipartUploadInput {
    /// The destination bucket.
    pub bucket: String,
    /// The destination key.
    pub key: String,
    /// The upload to abort.
    pub upload_id: String,
}
