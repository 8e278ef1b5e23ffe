//! Rendering typed outputs into HTTP responses.

use http::header::HeaderValue;
use s3dock_model::S3Error;
use s3dock_model::output::{
    CompleteMultipartUploadOutput, CopyObjectOutput, CreateBucketOutput,
    CreateMultipartUploadOutput, DeleteObjectsOutput, GetBucketAclOutput, GetBucketCorsOutput,
    GetBucketLocationOutput, GetBucketVersioningOutput, GetBucketWebsiteOutput, GetObjectOutput,
    HeadBucketOutput, HeadObjectOutput, ListBucketsOutput, ListObjectsOutput, ListObjectsV2Output,
    ObjectHeaders, PreflightOutput, PutObjectOutput, UploadPartOutput, WebsiteObjectOutput,
};
use s3dock_xml::{S3Serialize, render_error_document, to_xml};

use crate::body::S3ResponseBody;

/// Convert an operation output into an HTTP response.
pub trait IntoS3Response {
    /// Render this output.
    ///
    /// # Errors
    ///
    /// Returns an [`S3Error`] when the response cannot be built (an
    /// unencodable header value, an XML writer failure).
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error>;
}

// ---------------------------------------------------------------------------
// Building helpers
// ---------------------------------------------------------------------------

fn build(
    builder: http::response::Builder,
    body: S3ResponseBody,
) -> Result<http::Response<S3ResponseBody>, S3Error> {
    builder
        .body(body)
        .map_err(|e| S3Error::internal_error(format!("failed to build response: {e}")))
}

/// A 200 response whose body is the named XML document.
fn xml_response<T: S3Serialize>(
    root: &str,
    value: &T,
) -> Result<http::Response<S3ResponseBody>, S3Error> {
    let xml = to_xml(root, value)
        .map_err(|e| S3Error::internal_error(format!("failed to serialize {root}: {e}")))?;
    build(
        http::Response::builder()
            .status(http::StatusCode::OK)
            .header(http::header::CONTENT_TYPE, "application/xml"),
        S3ResponseBody::from_xml(xml),
    )
}

fn set_optional(
    builder: http::response::Builder,
    name: &str,
    value: Option<&str>,
) -> http::response::Builder {
    match value.and_then(|v| HeaderValue::from_str(v).ok()) {
        Some(hv) => builder.header(name, hv),
        None => builder,
    }
}

/// Format a timestamp the way `Last-Modified` wants it (RFC 1123).
fn http_date(dt: &chrono::DateTime<chrono::Utc>) -> String {
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Apply the shared object attribute headers (GetObject and HeadObject).
fn apply_object_headers(
    mut builder: http::response::Builder,
    headers: &ObjectHeaders,
) -> http::response::Builder {
    builder = builder
        .header(http::header::CONTENT_TYPE, &headers.content_type)
        .header(http::header::CONTENT_LENGTH, headers.content_length)
        .header(http::header::ETAG, &headers.etag)
        .header(http::header::ACCEPT_RANGES, "bytes");
    if let Some(last_modified) = &headers.last_modified {
        builder = builder.header(http::header::LAST_MODIFIED, http_date(last_modified));
    }
    builder = set_optional(
        builder,
        "content-encoding",
        headers.content_encoding.as_deref(),
    );
    builder = set_optional(
        builder,
        "content-disposition",
        headers.content_disposition.as_deref(),
    );
    builder = set_optional(builder, "cache-control", headers.cache_control.as_deref());
    builder = set_optional(builder, "expires", headers.expires.as_deref());
    for (name, value) in &headers.metadata {
        if let Ok(hv) = HeaderValue::from_str(value) {
            builder = builder.header(format!("x-amz-meta-{name}"), hv);
        }
    }
    builder
}

/// Render an error as its `<Error>` XML document.
#[must_use]
pub fn error_to_response(err: &S3Error, request_id: &str) -> http::Response<S3ResponseBody> {
    let xml = render_error_document(err, request_id);
    http::Response::builder()
        .status(err.status_code)
        .header(http::header::CONTENT_TYPE, "application/xml")
        .body(S3ResponseBody::from_xml(xml))
        .unwrap_or_else(|_| {
            let mut fallback = http::Response::new(S3ResponseBody::empty());
            *fallback.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}

// ---------------------------------------------------------------------------
// Bucket operations
// ---------------------------------------------------------------------------

impl IntoS3Response for ListBucketsOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        xml_response("ListAllMyBucketsResult", &self)
    }
}

impl IntoS3Response for CreateBucketOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        build(
            http::Response::builder()
                .status(http::StatusCode::OK)
                .header(http::header::LOCATION, &self.location),
            S3ResponseBody::empty(),
        )
    }
}

impl IntoS3Response for HeadBucketOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        build(
            http::Response::builder().status(http::StatusCode::OK),
            S3ResponseBody::empty(),
        )
    }
}

impl IntoS3Response for GetBucketLocationOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        xml_response("LocationConstraint", &self)
    }
}

impl IntoS3Response for GetBucketAclOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        xml_response("AccessControlPolicy", &self)
    }
}

impl IntoS3Response for GetBucketVersioningOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        xml_response("VersioningConfiguration", &self)
    }
}

impl IntoS3Response for GetBucketCorsOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        xml_response("CORSConfiguration", &self.configuration)
    }
}

impl IntoS3Response for GetBucketWebsiteOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        xml_response("WebsiteConfiguration", &self.configuration)
    }
}

// ---------------------------------------------------------------------------
// Listing operations
// ---------------------------------------------------------------------------

impl IntoS3Response for ListObjectsOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        xml_response("ListBucketResult", &self)
    }
}

impl IntoS3Response for ListObjectsV2Output {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        xml_response("ListBucketResult", &self)
    }
}

// ---------------------------------------------------------------------------
// Object operations
// ---------------------------------------------------------------------------

impl IntoS3Response for PutObjectOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        build(
            http::Response::builder()
                .status(http::StatusCode::OK)
                .header(http::header::ETAG, &self.etag),
            S3ResponseBody::empty(),
        )
    }
}

impl IntoS3Response for GetObjectOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        let status = if self.content_range.is_some() {
            http::StatusCode::PARTIAL_CONTENT
        } else {
            http::StatusCode::OK
        };
        let mut builder = http::Response::builder().status(status);
        builder = apply_object_headers(builder, &self.headers);
        builder = set_optional(builder, "content-range", self.content_range.as_deref());
        build(builder, S3ResponseBody::from_bytes(self.body))
    }
}

impl IntoS3Response for HeadObjectOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        let status = if self.content_range.is_some() {
            http::StatusCode::PARTIAL_CONTENT
        } else {
            http::StatusCode::OK
        };
        let mut builder = http::Response::builder().status(status);
        builder = apply_object_headers(builder, &self.headers);
        builder = set_optional(builder, "content-range", self.content_range.as_deref());
        build(builder, S3ResponseBody::empty())
    }
}

impl IntoS3Response for CopyObjectOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        xml_response("CopyObjectResult", &self)
    }
}

impl IntoS3Response for DeleteObjectsOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        xml_response("DeleteResult", &self)
    }
}

impl IntoS3Response for WebsiteObjectOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        build(
            http::Response::builder()
                .status(self.status)
                .header(http::header::CONTENT_TYPE, &self.content_type)
                .header(http::header::CONTENT_LENGTH, self.body.len()),
            S3ResponseBody::from_bytes(self.body),
        )
    }
}

// ---------------------------------------------------------------------------
// Multipart operations
// ---------------------------------------------------------------------------

impl IntoS3Response for CreateMultipartUploadOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        xml_response("InitiateMultipartUploadResult", &self)
    }
}

impl IntoS3Response for UploadPartOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        build(
            http::Response::builder()
                .status(http::StatusCode::OK)
                .header(http::header::ETAG, &self.etag),
            S3ResponseBody::empty(),
        )
    }
}

impl IntoS3Response for CompleteMultipartUploadOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        xml_response("CompleteMultipartUploadResult", &self)
    }
}

// ---------------------------------------------------------------------------
// Preflights
// ---------------------------------------------------------------------------

impl IntoS3Response for PreflightOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        // A denied preflight is an empty 403 with no CORS headers, never
        // an <Error> document.
        let Some(allow) = self.allow else {
            return build(
                http::Response::builder().status(http::StatusCode::FORBIDDEN),
                S3ResponseBody::empty(),
            );
        };

        let mut builder = http::Response::builder()
            .status(http::StatusCode::OK)
            .header("access-control-allow-origin", &allow.origin)
            .header("access-control-allow-methods", allow.methods.join(", "));
        if !allow.headers.is_empty() {
            builder = builder.header("access-control-allow-headers", allow.headers.join(", "));
        }
        if let Some(max_age) = allow.max_age_seconds {
            builder = builder.header("access-control-max-age", max_age);
        }
        build(builder, S3ResponseBody::empty())
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use chrono::TimeZone;
    use s3dock_model::S3ErrorCode;
    use s3dock_model::output::PreflightAllow;

    use super::*;

    fn header<'a>(resp: &'a http::Response<S3ResponseBody>, name: &str) -> Option<&'a str> {
        resp.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_should_render_get_object_with_wire_headers() {
        let mut metadata = std::collections::HashMap::new();
        metadata.insert("somekey".to_owned(), "value".to_owned());
        let output = GetObjectOutput {
            headers: ObjectHeaders {
                etag: "\"abc\"".to_owned(),
                last_modified: Some(
                    chrono::Utc
                        .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
                        .single()
                        .expect("timestamp"),
                ),
                content_type: "image/jpeg".to_owned(),
                content_length: 4,
                metadata,
                ..ObjectHeaders::default()
            },
            body: Bytes::from_static(b"data"),
            content_range: None,
        };
        let resp = output.into_s3_response().expect("render");

        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(header(&resp, "etag"), Some("\"abc\""));
        assert_eq!(header(&resp, "content-type"), Some("image/jpeg"));
        assert_eq!(header(&resp, "content-length"), Some("4"));
        assert_eq!(header(&resp, "accept-ranges"), Some("bytes"));
        assert_eq!(
            header(&resp, "last-modified"),
            Some("Fri, 01 Mar 2024 12:00:00 GMT")
        );
        assert_eq!(header(&resp, "x-amz-meta-somekey"), Some("value"));
    }

    #[test]
    fn test_should_render_range_reads_as_206() {
        let output = GetObjectOutput {
            headers: ObjectHeaders {
                etag: "\"abc\"".to_owned(),
                content_type: "binary/octet-stream".to_owned(),
                content_length: 100,
                ..ObjectHeaders::default()
            },
            body: Bytes::from(vec![0_u8; 100]),
            content_range: Some("bytes 0-99/65536".to_owned()),
        };
        let resp = output.into_s3_response().expect("render");

        assert_eq!(resp.status(), http::StatusCode::PARTIAL_CONTENT);
        assert_eq!(header(&resp, "content-range"), Some("bytes 0-99/65536"));
    }

    #[test]
    fn test_should_render_denied_preflight_as_empty_403() {
        let resp = PreflightOutput { allow: None }
            .into_s3_response()
            .expect("render");
        assert_eq!(resp.status(), http::StatusCode::FORBIDDEN);
        assert!(header(&resp, "access-control-allow-origin").is_none());
        assert!(resp.headers().get(http::header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_should_render_granted_preflight_headers() {
        let resp = PreflightOutput {
            allow: Some(PreflightAllow {
                origin: "https://example.com".to_owned(),
                methods: vec!["GET".to_owned(), "PUT".to_owned()],
                headers: vec!["content-type".to_owned()],
                max_age_seconds: Some(3000),
            }),
        }
        .into_s3_response()
        .expect("render");

        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(
            header(&resp, "access-control-allow-origin"),
            Some("https://example.com")
        );
        assert_eq!(
            header(&resp, "access-control-allow-methods"),
            Some("GET, PUT")
        );
        assert_eq!(
            header(&resp, "access-control-allow-headers"),
            Some("content-type")
        );
        assert_eq!(header(&resp, "access-control-max-age"), Some("3000"));
    }

    #[test]
    fn test_should_render_errors_as_xml_documents() {
        let err = S3Error::new(S3ErrorCode::BucketNotEmpty).with_resource("full-bucket");
        let resp = error_to_response(&err, "req-1");

        assert_eq!(resp.status(), http::StatusCode::CONFLICT);
        assert_eq!(header(&resp, "content-type"), Some("application/xml"));
    }
}
