//! Bridges the HTTP layer to the engine.
//!
//! [`S3DockHandler`] implements [`S3Handler`] by deserializing each routed
//! request into its typed input (via [`FromS3Request`]), calling the
//! matching `handle_*` method on [`S3Dock`], and serializing the output
//! (via [`IntoS3Response`]). It also owns the two cross-cutting behaviours
//! that need both the request and the engine: website-mode interception of
//! plain GETs, and CORS decoration of successful responses.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use s3dock_core::S3Dock;
use s3dock_core::cors::RANGE_EXPOSE_HEADERS;
use s3dock_http::body::S3ResponseBody;
use s3dock_http::dispatch::S3Handler;
use s3dock_http::request::FromS3Request;
use s3dock_http::response::IntoS3Response;
use s3dock_http::router::RoutingContext;
use s3dock_model::S3Operation;
use s3dock_model::error::S3Error;

/// Wrapper implementing [`S3Handler`] for the engine.
#[derive(Debug, Clone)]
pub struct S3DockHandler(pub S3Dock);

impl S3Handler for S3DockHandler {
    fn handle_operation(
        &self,
        op: S3Operation,
        parts: http::request::Parts,
        body: Bytes,
        ctx: RoutingContext,
    ) -> Pin<Box<dyn Future<Output = Result<http::Response<S3ResponseBody>, S3Error>> + Send>> {
        let provider = self.0.clone();
        Box::pin(async move {
            // Website mode hijacks plain GETs before normal dispatch. A GET
            // with listing parameters still reaches the listing engine, so
            // SDK traffic and browsers coexist.
            if let Some(response) = try_website(&provider, op, &ctx).await? {
                return Ok(decorate_cors(&provider, &parts, &ctx, response));
            }

            let response = dispatch(&provider, op, &parts, body, &ctx).await?;
            Ok(decorate_cors(&provider, &parts, &ctx, response))
        })
    }

    fn bucket_exists(&self, name: &str) -> bool {
        self.0.store().bucket_exists(name)
    }
}

/// Serve the request from the website router when it applies.
async fn try_website(
    provider: &S3Dock,
    op: S3Operation,
    ctx: &RoutingContext,
) -> Result<Option<http::Response<S3ResponseBody>>, S3Error> {
    let applies = match op {
        S3Operation::GetObject => true,
        S3Operation::ListObjects => ctx.query_params.is_empty(),
        _ => false,
    };
    if !applies {
        return Ok(None);
    }
    let Some(bucket) = ctx.bucket.as_deref() else {
        return Ok(None);
    };
    if !provider.website_enabled(bucket) {
        return Ok(None);
    }

    let key = ctx.key.clone().unwrap_or_default();
    let output = provider.handle_website_get(bucket, &key).await?;
    Ok(Some(output.into_s3_response()?))
}

/// One arm per operation; each is a single-line delegation.
#[allow(clippy::too_many_lines)]
async fn dispatch(
    provider: &S3Dock,
    op: S3Operation,
    parts: &http::request::Parts,
    body: Bytes,
    ctx: &RoutingContext,
) -> Result<http::Response<S3ResponseBody>, S3Error> {
    let bucket = ctx.bucket.as_deref();
    let key = ctx.key.as_deref();
    let params = &ctx.query_params;

    match op {
        S3Operation::ListBuckets => {
            dispatch_output(parts, bucket, key, params, body, |input| {
                provider.handle_list_buckets(input)
            })
            .await
        }
        S3Operation::CreateBucket => {
            dispatch_output(parts, bucket, key, params, body, |input| {
                provider.handle_create_bucket(input)
            })
            .await
        }
        S3Operation::DeleteBucket => {
            dispatch_void(parts, bucket, key, params, body, |input| {
                provider.handle_delete_bucket(input)
            })
            .await
        }
        S3Operation::HeadBucket => {
            dispatch_output(parts, bucket, key, params, body, |input| {
                provider.handle_head_bucket(input)
            })
            .await
        }
        S3Operation::GetBucketLocation => {
            dispatch_output(parts, bucket, key, params, body, |input| {
                provider.handle_get_bucket_location(input)
            })
            .await
        }
        S3Operation::GetBucketAcl => {
            dispatch_output(parts, bucket, key, params, body, |input| {
                provider.handle_get_bucket_acl(input)
            })
            .await
        }
        S3Operation::GetBucketPolicy => {
            dispatch_void(parts, bucket, key, params, body, |input| {
                provider.handle_get_bucket_policy(input)
            })
            .await
        }
        S3Operation::GetBucketVersioning => {
            dispatch_output(parts, bucket, key, params, body, |input| {
                provider.handle_get_bucket_versioning(input)
            })
            .await
        }
        S3Operation::GetBucketCors => {
            dispatch_output(parts, bucket, key, params, body, |input| {
                provider.handle_get_bucket_cors(input)
            })
            .await
        }
        S3Operation::PutBucketCors => {
            dispatch_void(parts, bucket, key, params, body, |input| {
                provider.handle_put_bucket_cors(input)
            })
            .await
        }
        S3Operation::DeleteBucketCors => {
            dispatch_void(parts, bucket, key, params, body, |input| {
                provider.handle_delete_bucket_cors(input)
            })
            .await
        }
        S3Operation::GetBucketWebsite => {
            dispatch_output(parts, bucket, key, params, body, |input| {
                provider.handle_get_bucket_website(input)
            })
            .await
        }
        S3Operation::PutBucketWebsite => {
            dispatch_void(parts, bucket, key, params, body, |input| {
                provider.handle_put_bucket_website(input)
            })
            .await
        }
        S3Operation::DeleteBucketWebsite => {
            dispatch_void(parts, bucket, key, params, body, |input| {
                provider.handle_delete_bucket_website(input)
            })
            .await
        }
        S3Operation::ListObjects => {
            dispatch_output(parts, bucket, key, params, body, |input| {
                provider.handle_list_objects(input)
            })
            .await
        }
        S3Operation::ListObjectsV2 => {
            dispatch_output(parts, bucket, key, params, body, |input| {
                provider.handle_list_objects_v2(input)
            })
            .await
        }
        S3Operation::PutObject => {
            dispatch_output(parts, bucket, key, params, body, |input| {
                provider.handle_put_object(input)
            })
            .await
        }
        S3Operation::GetObject => {
            dispatch_output(parts, bucket, key, params, body, |input| {
                provider.handle_get_object(input)
            })
            .await
        }
        S3Operation::HeadObject => {
            dispatch_output(parts, bucket, key, params, body, |input| {
                provider.handle_head_object(input)
            })
            .await
        }
        S3Operation::CopyObject => {
            dispatch_output(parts, bucket, key, params, body, |input| {
                provider.handle_copy_object(input)
            })
            .await
        }
        S3Operation::DeleteObject => {
            dispatch_void(parts, bucket, key, params, body, |input| {
                provider.handle_delete_object(input)
            })
            .await
        }
        S3Operation::DeleteObjects => {
            dispatch_output(parts, bucket, key, params, body, |input| {
                provider.handle_delete_objects(input)
            })
            .await
        }
        S3Operation::CreateMultipartUpload => {
            dispatch_output(parts, bucket, key, params, body, |input| {
                provider.handle_create_multipart_upload(input)
            })
            .await
        }
        S3Operation::UploadPart => {
            dispatch_output(parts, bucket, key, params, body, |input| {
                provider.handle_upload_part(input)
            })
            .await
        }
        S3Operation::CompleteMultipartUpload => {
            dispatch_output(parts, bucket, key, params, body, |input| {
                provider.handle_complete_multipart_upload(input)
            })
            .await
        }
        S3Operation::AbortMultipartUpload => {
            dispatch_void(parts, bucket, key, params, body, |input| {
                provider.handle_abort_multipart_upload(input)
            })
            .await
        }
        S3Operation::Preflight => {
            dispatch_output(parts, bucket, key, params, body, |input| {
                provider.handle_preflight(input)
            })
            .await
        }
    }
}

/// Deserialize, execute, serialize.
async fn dispatch_output<I, O, F, Fut>(
    parts: &http::request::Parts,
    bucket: Option<&str>,
    key: Option<&str>,
    query_params: &[(String, String)],
    body: Bytes,
    handler_fn: F,
) -> Result<http::Response<S3ResponseBody>, S3Error>
where
    I: FromS3Request,
    O: IntoS3Response,
    F: FnOnce(I) -> Fut,
    Fut: Future<Output = Result<O, S3Error>>,
{
    let input = I::from_s3_request(parts, bucket, key, query_params, body)?;
    let output = handler_fn(input).await?;
    output.into_s3_response()
}

/// Deserialize, execute; success is a 204 with no body.
async fn dispatch_void<I, F, Fut>(
    parts: &http::request::Parts,
    bucket: Option<&str>,
    key: Option<&str>,
    query_params: &[(String, String)],
    body: Bytes,
    handler_fn: F,
) -> Result<http::Response<S3ResponseBody>, S3Error>
where
    I: FromS3Request,
    F: FnOnce(I) -> Fut,
    Fut: Future<Output = Result<(), S3Error>>,
{
    let input = I::from_s3_request(parts, bucket, key, query_params, body)?;
    handler_fn(input).await?;
    http::Response::builder()
        .status(http::StatusCode::NO_CONTENT)
        .body(S3ResponseBody::empty())
        .map_err(|e| S3Error::internal_error(e.to_string()))
}

/// Attach CORS headers to a response when the request carried an `Origin`
/// matching one of the bucket's rules.
fn decorate_cors(
    provider: &S3Dock,
    parts: &http::request::Parts,
    ctx: &RoutingContext,
    mut response: http::Response<S3ResponseBody>,
) -> http::Response<S3ResponseBody> {
    if parts.method == http::Method::OPTIONS {
        // Preflight responses carry exactly the headers the grant decided.
        return response;
    }
    let Some(origin) = parts
        .headers
        .get(http::header::ORIGIN)
        .and_then(|v| v.to_str().ok())
    else {
        return response;
    };
    let Some(bucket) = ctx.bucket.as_deref() else {
        return response;
    };
    let Some(matched) = provider.match_cors(bucket, origin, parts.method.as_str()) else {
        return response;
    };

    let mut expose = matched.expose_headers.join(", ");
    if response.status() == http::StatusCode::PARTIAL_CONTENT {
        if !expose.is_empty() {
            expose.push_str(", ");
        }
        expose.push_str(RANGE_EXPOSE_HEADERS);
    }

    let headers = response.headers_mut();
    if let Ok(hv) = http::header::HeaderValue::from_str(&matched.allow_origin) {
        headers.insert("access-control-allow-origin", hv);
    }
    if !expose.is_empty() {
        if let Ok(hv) = http::header::HeaderValue::from_str(&expose) {
            headers.insert("access-control-expose-headers", hv);
        }
    }
    response
}
