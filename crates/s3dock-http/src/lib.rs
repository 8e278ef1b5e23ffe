//! The HTTP face of s3dock.
//!
//! A request flows through this crate in four steps:
//!
//! 1. [`router::S3Router`] resolves the target bucket (virtual-host or
//!    path style) and identifies the operation from method, path shape,
//!    query parameters, and headers.
//! 2. [`request::FromS3Request`] lifts headers, query parameters, and the
//!    body into the operation's typed input record.
//! 3. The [`dispatch::S3Handler`] implementation executes the operation.
//! 4. [`response::IntoS3Response`] renders the typed output record into
//!    status, headers, and an XML or raw body.
//!
//! [`service::S3HttpService`] wires the steps into a hyper `Service`.

pub mod body;
pub mod dispatch;
pub mod request;
pub mod response;
pub mod router;
pub mod service;

pub use body::S3ResponseBody;
pub use dispatch::S3Handler;
pub use router::{RoutingContext, S3Router};
pub use service::{S3HttpConfig, S3HttpService};
