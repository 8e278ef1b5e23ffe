//! Typed response records, one per operation.
//!
//! Handlers return these; the HTTP layer renders them into status codes,
//! headers, and XML or raw-byte bodies.

mod bucket;
mod config;
mod list;
mod multipart;
mod object;

pub use bucket::*;
pub use config::*;
pub use list::*;
pub use multipart::*;
pub use object::*;
