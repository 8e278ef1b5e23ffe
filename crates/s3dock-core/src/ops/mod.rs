//! Operation handlers, grouped the way the wire groups them.
//!
//! Each module adds `handle_*` methods to [`crate::provider::S3Dock`].

mod bucket;
mod bucket_config;
mod list;
mod multipart;
mod object;
mod website;
