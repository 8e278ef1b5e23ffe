//! Typed request records, one per operation.
//!
//! The HTTP layer lifts header, query, and body state into these records
//! before dispatch; handlers never look at raw requests.

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
