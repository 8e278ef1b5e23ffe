//! Request routing: bucket resolution and operation identification.
//!
//! The router decides along four axes: HTTP method, path shape (bucket
//! and/or key present), query parameters naming a sub-resource, and the
//! headers that distinguish otherwise-identical routes (`x-amz-copy-source`
//! turns a PUT into a copy, `Access-Control-Request-Method` turns an
//! OPTIONS into a preflight).
//!
//! Bucket resolution supports both URL conventions. Virtual-host style
//! applies when the `Host` header (minus port) differs from the configured
//! hostname and either carries it as a suffix (`bucket.localhost`), ends in
//! the standard service suffix (`bucket.s3.amazonaws.com`), or is itself a
//! known bucket name (CNAME style). Otherwise the first path segment names
//! the bucket.

use http::Method;
use percent_encoding::percent_decode_str;
use s3dock_model::error::S3Error;
use s3dock_model::operations::S3Operation;

/// The standard service suffix honoured for virtual-host requests.
const SERVICE_SUFFIX: &str = ".s3.amazonaws.com";

/// Header that turns an object PUT into a copy.
const COPY_SOURCE_HEADER: &str = "x-amz-copy-source";

/// Header that marks an OPTIONS request as a CORS preflight.
const PREFLIGHT_METHOD_HEADER: &str = "access-control-request-method";

/// Routing configuration.
#[derive(Debug, Clone)]
pub struct S3Router {
    /// The server's own hostname; requests addressed to it are path-style.
    pub hostname: String,
}

/// The outcome of routing one request.
#[derive(Debug, Clone)]
pub struct RoutingContext {
    /// The resolved bucket, if any.
    pub bucket: Option<String>,
    /// The resolved key, if any.
    pub key: Option<String>,
    /// The identified operation.
    pub operation: S3Operation,
    /// Decoded query parameters, in request order.
    pub query_params: Vec<(String, String)>,
}

impl S3Router {
    /// Create a router for the given hostname.
    #[must_use]
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
        }
    }

    /// Resolve a request to its operation and target.
    ///
    /// `is_known_bucket` answers whether a name is an existing bucket; it
    /// backs the CNAME-style virtual-host rule.
    ///
    /// # Errors
    ///
    /// `MethodNotAllowed` for verbs or verb/target shapes the service does
    /// not answer.
    pub fn resolve<B>(
        &self,
        req: &http::Request<B>,
        is_known_bucket: &dyn Fn(&str) -> bool,
    ) -> Result<RoutingContext, S3Error> {
        let query_params = parse_query(req.uri().query().unwrap_or(""));
        let path = req.uri().path();

        let vhost_bucket = host_header(req).and_then(|host| {
            self.bucket_from_host(strip_port(&host), is_known_bucket)
        });

        let (bucket, key) = match vhost_bucket {
            Some(bucket) => {
                let raw_key = path.strip_prefix('/').unwrap_or(path);
                let key = if raw_key.is_empty() {
                    None
                } else {
                    Some(decode_component(raw_key))
                };
                (Some(bucket), key)
            }
            None => parse_path(path),
        };

        let operation = identify_operation(req.method(), bucket.as_ref(), key.as_ref(), &query_params, req.headers())?;

        Ok(RoutingContext {
            bucket,
            key,
            operation,
            query_params,
        })
    }

    fn bucket_from_host(
        &self,
        host: &str,
        is_known_bucket: &dyn Fn(&str) -> bool,
    ) -> Option<String> {
        if host.is_empty() || host.eq_ignore_ascii_case(&self.hostname) {
            return None;
        }
        let own_suffix = format!(".{}", self.hostname);
        if let Some(label) = host.strip_suffix(own_suffix.as_str()) {
            if !label.is_empty() {
                return Some(label.to_owned());
            }
        }
        if let Some(label) = host.strip_suffix(SERVICE_SUFFIX) {
            if !label.is_empty() {
                return Some(label.to_owned());
            }
        }
        // CNAME style: the whole host is the bucket.
        if is_known_bucket(host) {
            return Some(host.to_owned());
        }
        None
    }
}

/// Extract the Host header value.
fn host_header<B>(req: &http::Request<B>) -> Option<String> {
    req.headers()
        .get(http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned)
}

/// Drop a `:port` suffix.
fn strip_port(host: &str) -> &str {
    host.split(':').next().unwrap_or(host)
}

/// Split `/bucket/key...` into its parts, percent-decoding both.
fn parse_path(path: &str) -> (Option<String>, Option<String>) {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return (None, None);
    }
    match trimmed.split_once('/') {
        Some((bucket, key_raw)) => {
            let key = if key_raw.is_empty() {
                None
            } else {
                Some(decode_component(key_raw))
            };
            (Some(decode_component(bucket)), key)
        }
        None => (Some(decode_component(trimmed)), None),
    }
}

fn decode_component(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

/// Parse a query string into decoded key-value pairs.
fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) => (decode_component(name), decode_component(value)),
            None => (decode_component(pair), String::new()),
        })
        .collect()
}

fn query_has(params: &[(String, String)], name: &str) -> bool {
    params.iter().any(|(k, _)| k == name)
}

fn query_value<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// The core decision: method + target shape + queries + headers.
fn identify_operation(
    method: &Method,
    bucket: Option<&String>,
    key: Option<&String>,
    params: &[(String, String)],
    headers: &http::HeaderMap,
) -> Result<S3Operation, S3Error> {
    // Preflights short-circuit everything else.
    if *method == Method::OPTIONS {
        if headers.contains_key(PREFLIGHT_METHOD_HEADER) {
            return Ok(S3Operation::Preflight);
        }
        return Err(S3Error::method_not_allowed("OPTIONS"));
    }

    match (method, bucket.is_some(), key.is_some()) {
        (&Method::GET, false, false) => Ok(S3Operation::ListBuckets),
        (method, true, false) => identify_bucket_operation(method, params),
        (method, true, true) => identify_object_operation(method, params, headers),
        _ => Err(S3Error::method_not_allowed(method.as_str())),
    }
}

fn identify_bucket_operation(
    method: &Method,
    params: &[(String, String)],
) -> Result<S3Operation, S3Error> {
    match *method {
        Method::GET => Ok(identify_bucket_get(params)),
        Method::PUT => {
            if query_has(params, "cors") {
                Ok(S3Operation::PutBucketCors)
            } else if query_has(params, "website") {
                Ok(S3Operation::PutBucketWebsite)
            } else {
                Ok(S3Operation::CreateBucket)
            }
        }
        Method::DELETE => {
            if query_has(params, "cors") {
                Ok(S3Operation::DeleteBucketCors)
            } else if query_has(params, "website") {
                Ok(S3Operation::DeleteBucketWebsite)
            } else {
                Ok(S3Operation::DeleteBucket)
            }
        }
        Method::HEAD => Ok(S3Operation::HeadBucket),
        Method::POST => {
            if query_has(params, "delete") {
                Ok(S3Operation::DeleteObjects)
            } else {
                Err(S3Error::method_not_allowed("POST"))
            }
        }
        _ => Err(S3Error::method_not_allowed(method.as_str())),
    }
}

fn identify_bucket_get(params: &[(String, String)]) -> S3Operation {
    if query_has(params, "location") {
        return S3Operation::GetBucketLocation;
    }
    if query_has(params, "cors") {
        return S3Operation::GetBucketCors;
    }
    if query_has(params, "acl") {
        return S3Operation::GetBucketAcl;
    }
    if query_has(params, "website") {
        return S3Operation::GetBucketWebsite;
    }
    if query_has(params, "policy") {
        return S3Operation::GetBucketPolicy;
    }
    if query_has(params, "versioning") {
        return S3Operation::GetBucketVersioning;
    }
    if query_value(params, "list-type") == Some("2") {
        return S3Operation::ListObjectsV2;
    }
    S3Operation::ListObjects
}

fn identify_object_operation(
    method: &Method,
    params: &[(String, String)],
    headers: &http::HeaderMap,
) -> Result<S3Operation, S3Error> {
    match *method {
        Method::GET => Ok(S3Operation::GetObject),
        Method::HEAD => Ok(S3Operation::HeadObject),
        Method::PUT => {
            if query_has(params, "partNumber") && query_has(params, "uploadId") {
                Ok(S3Operation::UploadPart)
            } else if headers.contains_key(COPY_SOURCE_HEADER) {
                Ok(S3Operation::CopyObject)
            } else {
                Ok(S3Operation::PutObject)
            }
        }
        Method::DELETE => {
            if query_has(params, "uploadId") {
                Ok(S3Operation::AbortMultipartUpload)
            } else {
                Ok(S3Operation::DeleteObject)
            }
        }
        Method::POST => {
            if query_has(params, "uploads") {
                Ok(S3Operation::CreateMultipartUpload)
            } else if query_has(params, "uploadId") {
                Ok(S3Operation::CompleteMultipartUpload)
            } else {
                Err(S3Error::method_not_allowed("POST"))
            }
        }
        _ => Err(S3Error::method_not_allowed(method.as_str())),
    }
}
