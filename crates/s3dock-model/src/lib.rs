//! Data model for the s3dock S3-compatible emulator.
//!
//! This crate defines the wire-level vocabulary shared by every other layer:
//!
//! - [`operations::S3Operation`] — the closed set of operations the emulator
//!   answers, identified by the HTTP router.
//! - [`error::S3Error`] / [`error::S3ErrorCode`] — wire errors with their
//!   default HTTP status codes and messages.
//! - [`input`] / [`output`] — one typed record per operation. The HTTP layer
//!   lifts headers, query parameters, and bodies into input records before
//!   dispatch, and renders responses from output records afterwards.
//! - [`types`] — document types that appear inside XML payloads (CORS and
//!   website configurations, bulk-delete documents, multipart completion).

pub mod error;
pub mod input;
pub mod operations;
pub mod output;
pub mod types;

pub use error::{S3Error, S3ErrorCode};
pub use operations::S3Operation;
