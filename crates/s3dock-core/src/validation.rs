//! Bucket-name grammar and object-key normalisation.
//!
//! Naming rules follow the
//! [bucket naming documentation](https://docs.aws.amazon.com/AmazonS3/latest/userguide/bucketnamingrules.html)
//! as far as the emulator cares: length, character set, label shape, and the
//! IP-address exclusion.

use std::net::Ipv4Addr;

use percent_encoding::percent_decode_str;

use crate::error::StoreError;

/// Minimum bucket name length.
const MIN_BUCKET_NAME_LEN: usize = 3;

/// Maximum bucket name length.
const MAX_BUCKET_NAME_LEN: usize = 63;

/// Maximum object key length in bytes.
const MAX_KEY_BYTES: usize = 1024;

/// Validate a bucket name.
///
/// Rules:
/// - 3-63 characters
/// - lowercase letters, digits, hyphens, and dots only
/// - starts with a letter or digit
/// - every dot-separated label is non-empty and neither starts nor ends
///   with a hyphen
/// - not shaped like an IPv4 address
///
/// # Errors
///
/// Returns [`StoreError::InvalidBucketName`] naming the violated rule.
///
/// # Examples
///
/// ```
/// use s3dock_core::validation::validate_bucket_name;
///
/// assert!(validate_bucket_name("my-bucket.backup").is_ok());
/// assert!(validate_bucket_name("No").is_err());
/// ```
pub fn validate_bucket_name(name: &str) -> Result<(), StoreError> {
    let reject = |reason: &str| StoreError::InvalidBucketName {
        name: name.to_owned(),
        reason: reason.to_owned(),
    };

    if !(MIN_BUCKET_NAME_LEN..=MAX_BUCKET_NAME_LEN).contains(&name.len()) {
        return Err(reject("name must be between 3 and 63 characters"));
    }

    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.')
    {
        return Err(reject(
            "name may only contain lowercase letters, digits, hyphens, and dots",
        ));
    }

    let first = name.as_bytes()[0];
    if !(first.is_ascii_lowercase() || first.is_ascii_digit()) {
        return Err(reject("name must start with a letter or digit"));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(reject("labels between dots must not be empty"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(reject("labels must not start or end with a hyphen"));
        }
    }

    if name.parse::<Ipv4Addr>().is_ok() {
        return Err(reject("name must not be shaped like an IP address"));
    }

    Ok(())
}

/// Validate an object key.
///
/// Keys pass through unchanged, but an empty key, a key over 1024 bytes, or
/// a key containing a `..` path segment is rejected. The `..` rule closes
/// directory traversal out of the data root.
///
/// # Errors
///
/// Returns [`StoreError::InvalidKey`] or [`StoreError::KeyTooLong`].
pub fn validate_object_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey {
            key: key.to_owned(),
            reason: "key must not be empty".to_owned(),
        });
    }
    if key.len() > MAX_KEY_BYTES {
        return Err(StoreError::KeyTooLong { length: key.len() });
    }
    if key.split('/').any(|segment| segment == "..") {
        return Err(StoreError::InvalidKey {
            key: key.to_owned(),
            reason: "key must not contain '..' path segments".to_owned(),
        });
    }
    Ok(())
}

/// Split an `x-amz-copy-source` header value into `(bucket, key)`.
///
/// The value is percent-decoded, one leading slash is stripped, and the
/// remainder is split at the first `/`. Both halves are then validated.
///
/// # Errors
///
/// Returns [`StoreError::InvalidRequest`] for values without a key part,
/// plus any name/key validation failure.
pub fn parse_copy_source(raw: &str) -> Result<(String, String), StoreError> {
    let decoded = percent_decode_str(raw).decode_utf8_lossy();
    let trimmed = decoded.strip_prefix('/').unwrap_or(&decoded);

    let (bucket, key) = trimmed
        .split_once('/')
        .ok_or_else(|| StoreError::InvalidRequest {
            message: format!("copy source {raw:?} must name a bucket and key"),
        })?;

    if bucket.is_empty() || key.is_empty() {
        return Err(StoreError::InvalidRequest {
            message: format!("copy source {raw:?} must name a bucket and key"),
        });
    }

    validate_bucket_name(bucket)?;
    validate_object_key(key)?;

    Ok((bucket.to_owned(), key.to_owned()))
}
