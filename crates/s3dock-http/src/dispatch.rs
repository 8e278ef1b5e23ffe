//! The boundary between the HTTP layer and the engine.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use s3dock_model::S3Operation;
use s3dock_model::error::S3Error;

use crate::body::S3ResponseBody;
use crate::router::RoutingContext;

/// Trait the engine implements to answer routed requests.
///
/// Boxed futures keep the trait object-safe so the service can hold an
/// `Arc<H>` without generics leaking into connection handling.
pub trait S3Handler: Send + Sync + 'static {
    /// Execute the identified operation and produce a full response.
    fn handle_operation(
        &self,
        op: S3Operation,
        parts: http::request::Parts,
        body: Bytes,
        ctx: RoutingContext,
    ) -> Pin<Box<dyn Future<Output = Result<http::Response<S3ResponseBody>, S3Error>> + Send>>;

    /// Whether a bucket with this name exists. Backs CNAME-style
    /// virtual-host routing; handlers without a store can leave the
    /// default.
    fn bucket_exists(&self, _name: &str) -> bool {
        false
    }
}

/// Route a resolved request into the handler.
pub async fn dispatch_operation<H: S3Handler>(
    handler: &H,
    parts: http::request::Parts,
    body: Bytes,
    ctx: RoutingContext,
) -> Result<http::Response<S3ResponseBody>, S3Error> {
    tracing::debug!(
        operation = %ctx.operation,
        bucket = ?ctx.bucket,
        key = ?ctx.key,
        "dispatching operation"
    );
    handler.handle_operation(ctx.operation, parts, body, ctx).await
}
