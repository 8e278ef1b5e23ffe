//! XML wire codec for the s3dock emulator.
//!
//! Serialization ([`S3Serialize`] / [`to_xml`]) renders response documents
//! (`ListBucketResult`, `CopyObjectResult`, `DeleteResult`, ...) through the
//! quick-xml event writer. Deserialization ([`S3Deserialize`] / [`from_xml`])
//! parses the request documents the emulator accepts (`CORSConfiguration`,
//! `WebsiteConfiguration`, `Delete`, `CompleteMultipartUpload`) with the
//! pull reader.
//!
//! Conventions follow the AWS RestXml protocol:
//! - namespace `http://s3.amazonaws.com/doc/2006-03-01/` on root elements
//! - timestamps as ISO 8601 with milliseconds (`2006-02-03T16:45:09.000Z`)
//! - a leading `<?xml version="1.0" encoding="UTF-8"?>` declaration

pub mod deserialize;
pub mod error;
pub mod serialize;

pub use deserialize::{S3Deserialize, from_xml};
pub use error::{XmlError, render_error_document};
pub use serialize::{S3Serialize, to_xml};
