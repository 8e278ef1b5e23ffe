//! The hyper `Service` tying routing, dispatch, and error rendering
//! together.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::service::Service;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::body::S3ResponseBody;
use crate::dispatch::{S3Handler, dispatch_operation};
use crate::response::error_to_response;
use crate::router::S3Router;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct S3HttpConfig {
    /// The hostname virtual-host routing compares against.
    pub hostname: String,
}

impl Default for S3HttpConfig {
    fn default() -> Self {
        Self {
            hostname: "localhost".to_owned(),
        }
    }
}

/// The request pipeline as a hyper `Service`.
///
/// Every request gets a request id, is routed, has its body collected,
/// and is dispatched to the handler; failures at any stage render as the
/// standard `<Error>` document.
pub struct S3HttpService<H: S3Handler> {
    handler: Arc<H>,
    router: S3Router,
}

impl<H: S3Handler> S3HttpService<H> {
    /// Create a service around a shared handler.
    #[must_use]
    pub fn new(handler: Arc<H>, config: &S3HttpConfig) -> Self {
        Self {
            handler,
            router: S3Router::new(&config.hostname),
        }
    }
}

impl<H: S3Handler> Clone for S3HttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            router: self.router.clone(),
        }
    }
}

impl<H: S3Handler> Service<http::Request<Incoming>> for S3HttpService<H> {
    type Response = http::Response<S3ResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let router = self.router.clone();

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();
            let response = process_request(req, handler.as_ref(), &router, &request_id).await;
            Ok(add_common_headers(response, &request_id))
        })
    }
}

async fn process_request<H: S3Handler>(
    req: http::Request<Incoming>,
    handler: &H,
    router: &S3Router,
    request_id: &str,
) -> http::Response<S3ResponseBody> {
    let method = req.method().clone();
    let uri = req.uri().clone();
    debug!(%method, %uri, request_id, "processing request");

    let ctx = match router.resolve(&req, &|name| handler.bucket_exists(name)) {
        Ok(ctx) => ctx,
        Err(err) => {
            warn!(%method, %uri, error = %err, request_id, "failed to route request");
            return error_to_response(&err, request_id);
        }
    };

    info!(
        operation = %ctx.operation,
        bucket = ?ctx.bucket,
        key = ?ctx.key,
        request_id,
        "routed request"
    );

    let (parts, incoming) = req.into_parts();
    let body = match collect_body(incoming).await {
        Ok(body) => body,
        Err(err) => {
            error!(error = %err, request_id, "failed to collect request body");
            let s3_err = s3dock_model::S3Error::internal_error("Failed to read request body");
            return error_to_response(&s3_err, request_id);
        }
    };

    match dispatch_operation(handler, parts, body, ctx).await {
        Ok(response) => response,
        Err(err) => {
            debug!(error = %err, request_id, "operation returned error");
            error_to_response(&err, request_id)
        }
    }
}

async fn collect_body(incoming: Incoming) -> Result<Bytes, hyper::Error> {
    Ok(incoming.collect().await?.to_bytes())
}

fn add_common_headers(
    mut response: http::Response<S3ResponseBody>,
    request_id: &str,
) -> http::Response<S3ResponseBody> {
    let headers = response.headers_mut();
    if let Ok(hv) = http::header::HeaderValue::from_str(request_id) {
        headers.insert("x-amz-request-id", hv.clone());
        headers.insert("x-amz-id-2", hv);
    }
    headers.insert(
        http::header::SERVER,
        http::header::HeaderValue::from_static("s3dock"),
    );
    response
}
