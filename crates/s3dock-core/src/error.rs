//! Domain errors for the store engine.

use s3dock_model::{S3Error, S3ErrorCode};

/// Errors produced by the store and its sibling engines.
///
/// Each variant maps onto exactly one wire error code via
/// [`StoreError::into_s3_error`]. Unexpected filesystem failures are carried
/// as [`StoreError::Io`] and surface as `InternalError` with the underlying
/// message logged but never leaked into the response body.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The named bucket does not exist.
    #[error("no such bucket: {bucket}")]
    NoSuchBucket {
        /// The missing bucket.
        bucket: String,
    },

    /// The named key does not exist in the bucket.
    #[error("no such key: {key}")]
    NoSuchKey {
        /// The missing key.
        key: String,
    },

    /// The bucket still holds objects.
    #[error("bucket not empty: {bucket}")]
    BucketNotEmpty {
        /// The non-empty bucket.
        bucket: String,
    },

    /// The bucket name is taken by something that is not a bucket directory.
    #[error("bucket already exists: {bucket}")]
    BucketAlreadyExists {
        /// The conflicting name.
        bucket: String,
    },

    /// The bucket name violates the naming grammar.
    #[error("invalid bucket name {name:?}: {reason}")]
    InvalidBucketName {
        /// The rejected name.
        name: String,
        /// Which rule was violated.
        reason: String,
    },

    /// The object key is unusable (empty, traversal segments, bad shape).
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey {
        /// The rejected key.
        key: String,
        /// Which rule was violated.
        reason: String,
    },

    /// The object key exceeds the maximum length.
    #[error("key too long: {length} bytes")]
    KeyTooLong {
        /// The offending length.
        length: usize,
    },

    /// A request was structurally invalid (e.g. copy onto itself).
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// What was wrong.
        message: String,
    },

    /// The supplied `Content-MD5` did not match the received bytes.
    #[error("content digest mismatch")]
    DigestMismatch,

    /// The requested byte range cannot be satisfied.
    #[error("unsatisfiable range: {range}")]
    UnsatisfiableRange {
        /// The raw `Range` header value.
        range: String,
    },

    /// The named multipart upload does not exist.
    #[error("no such upload: {upload_id}")]
    NoSuchUpload {
        /// The missing upload id.
        upload_id: String,
    },

    /// A referenced part was never uploaded.
    #[error("invalid part: {part_number}")]
    InvalidPart {
        /// The missing part number.
        part_number: u32,
    },

    /// The completion part list was not in ascending order.
    #[error("part list not in ascending order")]
    InvalidPartOrder,

    /// A blob exists without its sidecar (or the sidecar is unreadable).
    /// This is an internal consistency violation, not a client error.
    #[error("corrupt object state for key {key:?}: {detail}")]
    Corrupt {
        /// The affected key.
        key: String,
        /// What was observed.
        detail: String,
    },

    /// An unexpected filesystem error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Convert into the wire error rendered to the client.
    #[must_use]
    pub fn into_s3_error(self) -> S3Error {
        match self {
            Self::NoSuchBucket { bucket } => S3Error::no_such_bucket(bucket),
            Self::NoSuchKey { key } => S3Error::no_such_key(key),
            Self::BucketNotEmpty { bucket } => S3Error::bucket_not_empty(bucket),
            Self::BucketAlreadyExists { bucket } => S3Error::bucket_already_exists(bucket),
            Self::InvalidBucketName { name, .. } => S3Error::invalid_bucket_name(name),
            Self::InvalidKey { key, reason } => {
                S3Error::invalid_request(format!("invalid key {key:?}: {reason}"))
            }
            Self::KeyTooLong { .. } => S3Error::new(S3ErrorCode::KeyTooLongError),
            Self::InvalidRequest { message } => S3Error::invalid_request(message),
            Self::DigestMismatch => S3Error::new(S3ErrorCode::InvalidDigest),
            Self::UnsatisfiableRange { range } => S3Error::invalid_range(range),
            Self::NoSuchUpload { upload_id } => S3Error::no_such_upload(upload_id),
            Self::InvalidPart { part_number } => {
                S3Error::new(S3ErrorCode::InvalidPart).with_resource(part_number.to_string())
            }
            Self::InvalidPartOrder => S3Error::new(S3ErrorCode::InvalidPartOrder),
            Self::Corrupt { key, detail } => {
                tracing::error!(key = %key, detail = %detail, "object state corrupt");
                S3Error::new(S3ErrorCode::InternalError)
            }
            Self::Io(err) => {
                tracing::error!(error = %err, "filesystem error");
                S3Error::new(S3ErrorCode::InternalError).with_source(err)
            }
        }
    }
}

impl From<StoreError> for S3Error {
    fn from(err: StoreError) -> Self {
        err.into_s3_error()
    }
}
