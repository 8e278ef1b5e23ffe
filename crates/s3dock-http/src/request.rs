//! Lifting HTTP requests into typed operation inputs.

use std::collections::HashMap;

use bytes::Bytes;
use s3dock_model::error::{S3Error, S3ErrorCode};
use s3dock_model::input::{
    AbortMultipartUploadInput, CompleteMultipartUploadInput, CopyObjectInput, CreateBucketInput,
    CreateMultipartUploadInput, DeleteBucketCorsInput, DeleteBucketInput, DeleteBucketWebsiteInput,
    DeleteObjectInput, DeleteObjectsInput, GetBucketAclInput, GetBucketCorsInput,
    GetBucketLocationInput, GetBucketPolicyInput, GetBucketVersioningInput, GetBucketWebsiteInput,
    GetObjectInput, HeadBucketInput, HeadObjectInput, ListBucketsInput, ListObjectsInput,
    ListObjectsV2Input, PreflightInput, PutBucketCorsInput, PutBucketWebsiteInput, PutObjectInput,
    UploadPartInput,
};
use s3dock_model::types::{
    CompletedMultipartUpload, CorsConfiguration, Delete, MetadataDirective, WebsiteConfiguration,
};
use s3dock_xml::from_xml;

/// Prefix of user-metadata headers.
const METADATA_PREFIX: &str = "x-amz-meta-";

/// Extract an operation's input from the routed request parts.
pub trait FromS3Request: Sized {
    /// Build the input from headers, routing results, query parameters,
    /// and the collected body.
    ///
    /// # Errors
    ///
    /// Returns an [`S3Error`] when required fields are missing or cannot
    /// be parsed (`InvalidRequest`, `InvalidArgument`, `MalformedXML`).
    fn from_s3_request(
        parts: &http::request::Parts,
        bucket: Option<&str>,
        key: Option<&str>,
        query_params: &[(String, String)],
        body: Bytes,
    ) -> Result<Self, S3Error>;
}

// ---------------------------------------------------------------------------
// Extraction helpers
// ---------------------------------------------------------------------------

/// A header value as an owned string.
pub fn header_str(parts: &http::request::Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned)
}

/// A query parameter value by name.
#[must_use]
pub fn query_param(params: &[(String, String)], name: &str) -> Option<String> {
    params
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.clone())
}

/// All `x-amz-meta-*` headers, names lowercased with the prefix stripped.
pub fn collect_metadata(parts: &http::request::Parts) -> HashMap<String, String> {
    parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            let stripped = name.as_str().strip_prefix(METADATA_PREFIX)?;
            let value = value.to_str().ok()?;
            Some((stripped.to_owned(), value.to_owned()))
        })
        .collect()
}

fn require_bucket(bucket: Option<&str>) -> Result<String, S3Error> {
    bucket
        .map(ToOwned::to_owned)
        .ok_or_else(|| S3Error::invalid_request("Bucket name is required"))
}

fn require_key(key: Option<&str>) -> Result<String, S3Error> {
    key.map(ToOwned::to_owned)
        .ok_or_else(|| S3Error::invalid_request("Object key is required"))
}

fn parse_xml_body<T: s3dock_xml::S3Deserialize>(body: &Bytes) -> Result<T, S3Error> {
    from_xml(body).map_err(|e| S3Error::malformed_xml(e.to_string()))
}

/// Parse a numeric query parameter, rejecting garbage values outright.
fn query_param_usize(params: &[(String, String)], name: &str) -> Result<Option<usize>, S3Error> {
    match query_param(params, name) {
        None => Ok(None),
        Some(raw) => raw.parse::<usize>().map(Some).map_err(|_| {
            S3Error::with_message(
                S3ErrorCode::InvalidArgument,
                format!("Argument {name} must be a non-negative integer"),
            )
        }),
    }
}

// ---------------------------------------------------------------------------
// Bucket-only inputs
// ---------------------------------------------------------------------------

/// Implement `FromS3Request` for inputs carrying only the bucket name.
macro_rules! impl_bucket_only_input {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl FromS3Request for $ty {
                fn from_s3_request(
                    _parts: &http::request::Parts,
                    bucket: Option<&str>,
                    _key: Option<&str>,
                    _query_params: &[(String, String)],
                    _body: Bytes,
                ) -> Result<Self, S3Error> {
                    Ok(Self {
                        bucket: require_bucket(bucket)?,
                    })
                }
            }
        )+
    };
}

impl_bucket_only_input!(
    CreateBucketInput,
    DeleteBucketInput,
    HeadBucketInput,
    GetBucketLocationInput,
    GetBucketAclInput,
    GetBucketPolicyInput,
    GetBucketVersioningInput,
    GetBucketCorsInput,
    DeleteBucketCorsInput,
    GetBucketWebsiteInput,
    DeleteBucketWebsiteInput,
);

impl FromS3Request for ListBucketsInput {
    fn from_s3_request(
        _parts: &http::request::Parts,
        _bucket: Option<&str>,
        _key: Option<&str>,
        _query_params: &[(String, String)],
        _body: Bytes,
    ) -> Result<Self, S3Error> {
        Ok(Self {})
    }
}

// ---------------------------------------------------------------------------
// Configuration inputs
// ---------------------------------------------------------------------------

impl FromS3Request for PutBucketCorsInput {
    fn from_s3_request(
        _parts: &http::request::Parts,
        bucket: Option<&str>,
        _key: Option<&str>,
        _query_params: &[(String, String)],
        body: Bytes,
    ) -> Result<Self, S3Error> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            configuration: parse_xml_body::<CorsConfiguration>(&body)?,
        })
    }
}

impl FromS3Request for PutBucketWebsiteInput {
    fn from_s3_request(
        _parts: &http::request::Parts,
        bucket: Option<&str>,
        _key: Option<&str>,
        _query_params: &[(String, String)],
        body: Bytes,
    ) -> Result<Self, S3Error> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            configuration: parse_xml_body::<WebsiteConfiguration>(&body)?,
        })
    }
}

impl FromS3Request for PreflightInput {
    fn from_s3_request(
        parts: &http::request::Parts,
        bucket: Option<&str>,
        _key: Option<&str>,
        _query_params: &[(String, String)],
        _body: Bytes,
    ) -> Result<Self, S3Error> {
        let request_headers = header_str(parts, "access-control-request-headers")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|h| !h.is_empty())
                    .map(ToOwned::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            // A preflight may target the service root; an empty bucket
            // matches only server-wide rules.
            bucket: bucket.unwrap_or("").to_owned(),
            origin: header_str(parts, "origin").unwrap_or_default(),
            request_method: header_str(parts, "access-control-request-method")
                .unwrap_or_default(),
            request_headers,
        })
    }
}

// ---------------------------------------------------------------------------
// Listing inputs
// ---------------------------------------------------------------------------

impl FromS3Request for ListObjectsInput {
    fn from_s3_request(
        _parts: &http::request::Parts,
        bucket: Option<&str>,
        _key: Option<&str>,
        query_params: &[(String, String)],
        _body: Bytes,
    ) -> Result<Self, S3Error> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            prefix: query_param(query_params, "prefix"),
            marker: query_param(query_params, "marker"),
            delimiter: query_param(query_params, "delimiter"),
            max_keys: query_param_usize(query_params, "max-keys")?,
        })
    }
}

impl FromS3Request for ListObjectsV2Input {
    fn from_s3_request(
        _parts: &http::request::Parts,
        bucket: Option<&str>,
        _key: Option<&str>,
        query_params: &[(String, String)],
        _body: Bytes,
    ) -> Result<Self, S3Error> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            prefix: query_param(query_params, "prefix"),
            start_after: query_param(query_params, "start-after"),
            continuation_token: query_param(query_params, "continuation-token"),
            delimiter: query_param(query_params, "delimiter"),
            max_keys: query_param_usize(query_params, "max-keys")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Object inputs
// ---------------------------------------------------------------------------

impl FromS3Request for PutObjectInput {
    fn from_s3_request(
        parts: &http::request::Parts,
        bucket: Option<&str>,
        key: Option<&str>,
        _query_params: &[(String, String)],
        body: Bytes,
    ) -> Result<Self, S3Error> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            key: require_key(key)?,
            body,
            content_type: header_str(parts, "content-type"),
            content_md5: header_str(parts, "content-md5"),
            content_encoding: header_str(parts, "content-encoding"),
            content_disposition: header_str(parts, "content-disposition"),
            cache_control: header_str(parts, "cache-control"),
            expires: header_str(parts, "expires"),
            metadata: collect_metadata(parts),
        })
    }
}

impl FromS3Request for GetObjectInput {
    fn from_s3_request(
        parts: &http::request::Parts,
        bucket: Option<&str>,
        key: Option<&str>,
        _query_params: &[(String, String)],
        _body: Bytes,
    ) -> Result<Self, S3Error> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            key: require_key(key)?,
            range: header_str(parts, "range"),
        })
    }
}

impl FromS3Request for HeadObjectInput {
    fn from_s3_request(
        parts: &http::request::Parts,
        bucket: Option<&str>,
        key: Option<&str>,
        _query_params: &[(String, String)],
        _body: Bytes,
    ) -> Result<Self, S3Error> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            key: require_key(key)?,
            range: header_str(parts, "range"),
        })
    }
}

impl FromS3Request for CopyObjectInput {
    fn from_s3_request(
        parts: &http::request::Parts,
        bucket: Option<&str>,
        key: Option<&str>,
        _query_params: &[(String, String)],
        _body: Bytes,
    ) -> Result<Self, S3Error> {
        let copy_source = header_str(parts, "x-amz-copy-source")
            .ok_or_else(|| S3Error::invalid_request("x-amz-copy-source header is required"))?;
        let metadata_directive = header_str(parts, "x-amz-metadata-directive")
            .map(|raw| MetadataDirective::from_header(&raw))
            .unwrap_or_default();

        Ok(Self {
            bucket: require_bucket(bucket)?,
            key: require_key(key)?,
            copy_source,
            metadata_directive,
            content_type: header_str(parts, "content-type"),
            metadata: collect_metadata(parts),
        })
    }
}

impl FromS3Request for DeleteObjectInput {
    fn from_s3_request(
        _parts: &http::request::Parts,
        bucket: Option<&str>,
        key: Option<&str>,
        _query_params: &[(String, String)],
        _body: Bytes,
    ) -> Result<Self, S3Error> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            key: require_key(key)?,
        })
    }
}

impl FromS3Request for DeleteObjectsInput {
    fn from_s3_request(
        _parts: &http::request::Parts,
        bucket: Option<&str>,
        _key: Option<&str>,
        _query_params: &[(String, String)],
        body: Bytes,
    ) -> Result<Self, S3Error> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            delete: parse_xml_body::<Delete>(&body)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Multipart inputs
// ---------------------------------------------------------------------------

impl FromS3Request for CreateMultipartUploadInput {
    fn from_s3_request(
        parts: &http::request::Parts,
        bucket: Option<&str>,
        key: Option<&str>,
        _query_params: &[(String, String)],
        _body: Bytes,
    ) -> Result<Self, S3Error> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            key: require_key(key)?,
            content_type: header_str(parts, "content-type"),
            content_encoding: header_str(parts, "content-encoding"),
            content_disposition: header_str(parts, "content-disposition"),
            cache_control: header_str(parts, "cache-control"),
            expires: header_str(parts, "expires"),
            metadata: collect_metadata(parts),
        })
    }
}

impl FromS3Request for UploadPartInput {
    fn from_s3_request(
        parts: &http::request::Parts,
        bucket: Option<&str>,
        key: Option<&str>,
        query_params: &[(String, String)],
        body: Bytes,
    ) -> Result<Self, S3Error> {
        let part_number = query_param(query_params, "partNumber")
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|n| (1..=10_000).contains(n))
            .ok_or_else(|| {
                S3Error::with_message(
                    S3ErrorCode::InvalidArgument,
                    "Part number must be an integer between 1 and 10000, inclusive",
                )
            })?;

        Ok(Self {
            bucket: require_bucket(bucket)?,
            key: require_key(key)?,
            upload_id: require_upload_id(query_params)?,
            part_number,
            body,
            content_md5: header_str(parts, "content-md5"),
        })
    }
}

impl FromS3Request for CompleteMultipartUploadInput {
    fn from_s3_request(
        _parts: &http::request::Parts,
        bucket: Option<&str>,
        key: Option<&str>,
        query_params: &[(String, String)],
        body: Bytes,
    ) -> Result<Self, S3Error> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            key: require_key(key)?,
            upload_id: require_upload_id(query_params)?,
            multipart_upload: parse_xml_body::<CompletedMultipartUpload>(&body)?,
        })
    }
}

impl FromS3Request for AbortMultipartUploadInput {
    fn from_s3_request(
        _parts: &http::request::Parts,
        bucket: Option<&str>,
        key: Option<&str>,
        query_params: &[(String, String)],
        _body: Bytes,
    ) -> Result<Self, S3Error> {
        Ok(Self {
            bucket: require_bucket(bucket)?,
            key: require_key(key)?,
            upload_id: require_upload_id(query_params)?,
        })
    }
}

fn require_upload_id(query_params: &[(String, String)]) -> Result<String, S3Error> {
    query_param(query_params, "uploadId")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| S3Error::invalid_request("uploadId query parameter is required"))
}
