//! Output records for multipart upload operations.

/// Output of CreateMultipartUpload, rendered as
/// `InitiateMultipartUploadResult`.
#[derive(Debug, Clone)]
pub struct CreateMultipartUploadOutput {
    /// The destination bucket.
    pub bucket: String,
    /// The destination key.
    pub key: String,
    /// The allocated upload id.
    pub upload_id: String,
}

/// Output of the UploadPart operation.
#[derive(Debug, Clone)]
pub struct UploadPartOutput {
    /// Quoted hex MD5 etag of the staged part.
    pub etag: String,
}

/// Output of CompleteMultipartUpload, rendered as
/// `CompleteMultipartUploadResult`.
#[derive(Debug, Clone)]
pub struct CompleteMultipartUploadOutput {
    /// Location of the assembled object (`/<bucket>/<key>`).
    pub location: String,
    /// The destination bucket.
    pub bucket: String,
    /// The destination key.
    pub key: String,
    /// Quoted hex MD5 etag of the assembled content.
    pub etag: String,
}
