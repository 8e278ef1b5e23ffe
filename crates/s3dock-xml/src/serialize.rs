//! Rendering response documents as S3-compatible XML.

use std::io::{self, Write};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};
use s3dock_model::output::{
    CompleteMultipartUploadOutput, CopyObjectOutput, CreateMultipartUploadOutput,
    DeleteObjectsOutput, GetBucketAclOutput, GetBucketLocationOutput, GetBucketVersioningOutput,
    ListBucketsOutput, ListObjectsOutput, ListObjectsV2Output,
};
use s3dock_model::types::{CorsConfiguration, ObjectSummary, WebsiteConfiguration};

use crate::error::XmlError;

/// The S3 XML namespace stamped on every root element.
pub const S3_XML_NAMESPACE: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

/// Trait for rendering a document's child elements.
///
/// The root element and namespace are written by [`to_xml`]; implementors
/// write their content inside it. Closures passed to the quick-xml element
/// writer must return `io::Result`, hence the signature.
pub trait S3Serialize {
    /// Write this value's child elements into the given writer.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if writing fails.
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()>;
}

/// Render a complete document: declaration, namespaced root, content.
///
/// # Errors
///
/// Returns [`XmlError`] if serialization fails.
pub fn to_xml<T: S3Serialize>(root_element: &str, value: &T) -> Result<Vec<u8>, XmlError> {
    let mut buf = Vec::with_capacity(512);
    let mut writer = Writer::new(&mut buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer
        .create_element(root_element)
        .with_attribute(("xmlns", S3_XML_NAMESPACE))
        .write_inner_content(|w| value.serialize_xml(w))?;

    Ok(buf)
}

// ---------------------------------------------------------------------------
// Writing helpers
// ---------------------------------------------------------------------------

/// Write `<tag>text</tag>`.
fn text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> io::Result<()> {
    writer
        .create_element(tag)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

/// Write `<tag>text</tag>` only when the value is present.
fn optional_text<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: Option<&str>,
) -> io::Result<()> {
    if let Some(v) = value {
        text_element(writer, tag, v)?;
    }
    Ok(())
}

/// Write `<tag>true|false</tag>`.
fn bool_element<W: Write>(writer: &mut Writer<W>, tag: &str, value: bool) -> io::Result<()> {
    text_element(writer, tag, if value { "true" } else { "false" })
}

/// Format a timestamp the way listing documents expect it.
fn format_timestamp(dt: &chrono::DateTime<chrono::Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Write the `<Contents>` entries of a listing.
fn write_contents<W: Write>(writer: &mut Writer<W>, objects: &[ObjectSummary]) -> io::Result<()> {
    for obj in objects {
        writer.create_element("Contents").write_inner_content(|w| {
            text_element(w, "Key", &obj.key)?;
            text_element(w, "LastModified", &format_timestamp(&obj.last_modified))?;
            text_element(w, "ETag", &obj.etag)?;
            text_element(w, "Size", &obj.size.to_string())?;
            text_element(w, "StorageClass", "STANDARD")?;
            Ok(())
        })?;
    }
    Ok(())
}

/// Write the `<CommonPrefixes>` entries of a listing.
fn write_common_prefixes<W: Write>(writer: &mut Writer<W>, prefixes: &[String]) -> io::Result<()> {
    for prefix in prefixes {
        writer
            .create_element("CommonPrefixes")
            .write_inner_content(|w| text_element(w, "Prefix", prefix))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Response documents
// ---------------------------------------------------------------------------

impl S3Serialize for ListBucketsOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Owner").write_inner_content(|w| {
            text_element(w, "ID", "s3dock")?;
            text_element(w, "DisplayName", "s3dock")?;
            Ok(())
        })?;
        writer.create_element("Buckets").write_inner_content(|w| {
            for bucket in &self.buckets {
                w.create_element("Bucket").write_inner_content(|w| {
                    text_element(w, "Name", &bucket.name)?;
                    text_element(
                        w,
                        "CreationDate",
                        &format_timestamp(&bucket.creation_date),
                    )?;
                    Ok(())
                })?;
            }
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for ListObjectsOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        text_element(writer, "Name", &self.name)?;
        text_element(writer, "Prefix", self.prefix.as_deref().unwrap_or(""))?;
        text_element(writer, "Marker", self.marker.as_deref().unwrap_or(""))?;
        optional_text(writer, "NextMarker", self.next_marker.as_deref())?;
        text_element(writer, "MaxKeys", &self.max_keys.to_string())?;
        optional_text(writer, "Delimiter", self.delimiter.as_deref())?;
        bool_element(writer, "IsTruncated", self.is_truncated)?;
        write_contents(writer, &self.contents)?;
        write_common_prefixes(writer, &self.common_prefixes)?;
        Ok(())
    }
}

impl S3Serialize for ListObjectsV2Output {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        text_element(writer, "Name", &self.name)?;
        text_element(writer, "Prefix", self.prefix.as_deref().unwrap_or(""))?;
        optional_text(writer, "StartAfter", self.start_after.as_deref())?;
        optional_text(
            writer,
            "ContinuationToken",
            self.continuation_token.as_deref(),
        )?;
        optional_text(
            writer,
            "NextContinuationToken",
            self.next_continuation_token.as_deref(),
        )?;
        text_element(writer, "KeyCount", &self.key_count.to_string())?;
        text_element(writer, "MaxKeys", &self.max_keys.to_string())?;
        optional_text(writer, "Delimiter", self.delimiter.as_deref())?;
        bool_element(writer, "IsTruncated", self.is_truncated)?;
        write_contents(writer, &self.contents)?;
        write_common_prefixes(writer, &self.common_prefixes)?;
        Ok(())
    }
}

impl S3Serialize for CopyObjectOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        text_element(
            writer,
            "LastModified",
            &format_timestamp(&self.last_modified),
        )?;
        text_element(writer, "ETag", &self.etag)?;
        Ok(())
    }
}

impl S3Serialize for DeleteObjectsOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        for deleted in &self.deleted {
            writer
                .create_element("Deleted")
                .write_inner_content(|w| text_element(w, "Key", &deleted.key))?;
        }
        for error in &self.errors {
            writer.create_element("Error").write_inner_content(|w| {
                text_element(w, "Key", &error.key)?;
                text_element(w, "Code", &error.code)?;
                text_element(w, "Message", &error.message)?;
                Ok(())
            })?;
        }
        Ok(())
    }
}

impl S3Serialize for CreateMultipartUploadOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        text_element(writer, "Bucket", &self.bucket)?;
        text_element(writer, "Key", &self.key)?;
        text_element(writer, "UploadId", &self.upload_id)?;
        Ok(())
    }
}

impl S3Serialize for CompleteMultipartUploadOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        text_element(writer, "Location", &self.location)?;
        text_element(writer, "Bucket", &self.bucket)?;
        text_element(writer, "Key", &self.key)?;
        text_element(writer, "ETag", &self.etag)?;
        Ok(())
    }
}

impl S3Serialize for CorsConfiguration {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        for rule in &self.rules {
            writer.create_element("CORSRule").write_inner_content(|w| {
                for origin in &rule.allowed_origins {
                    text_element(w, "AllowedOrigin", origin)?;
                }
                for method in &rule.allowed_methods {
                    text_element(w, "AllowedMethod", method)?;
                }
                for header in &rule.allowed_headers {
                    text_element(w, "AllowedHeader", header)?;
                }
                for header in &rule.expose_headers {
                    text_element(w, "ExposeHeader", header)?;
                }
                if let Some(max_age) = rule.max_age_seconds {
                    text_element(w, "MaxAgeSeconds", &max_age.to_string())?;
                }
                Ok(())
            })?;
        }
        Ok(())
    }
}

impl S3Serialize for WebsiteConfiguration {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer
            .create_element("IndexDocument")
            .write_inner_content(|w| text_element(w, "Suffix", &self.index_document))?;
        if let Some(error_document) = &self.error_document {
            writer
                .create_element("ErrorDocument")
                .write_inner_content(|w| text_element(w, "Key", error_document))?;
        }
        Ok(())
    }
}

impl S3Serialize for GetBucketLocationOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        if let Some(constraint) = self.location_constraint.as_deref() {
            writer.write_event(Event::Text(BytesText::new(constraint)))?;
        }
        Ok(())
    }
}

impl S3Serialize for GetBucketVersioningOutput {
    fn serialize_xml<W: Write>(&self, _writer: &mut Writer<W>) -> io::Result<()> {
        // An unconfigured bucket answers with an empty VersioningConfiguration.
        Ok(())
    }
}

impl S3Serialize for GetBucketAclOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Owner").write_inner_content(|w| {
            text_element(w, "ID", &self.owner_id)?;
            text_element(w, "DisplayName", &self.owner_display_name)?;
            Ok(())
        })?;
        writer
            .create_element("AccessControlList")
            .write_inner_content(|w| {
                w.create_element("Grant").write_inner_content(|w| {
                    w.create_element("Grantee")
                        .with_attribute(("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"))
                        .with_attribute(("xsi:type", "CanonicalUser"))
                        .write_inner_content(|w| {
                            text_element(w, "ID", &self.owner_id)?;
                            text_element(w, "DisplayName", &self.owner_display_name)?;
                            Ok(())
                        })?;
                    text_element(w, "Permission", "FULL_CONTROL")?;
                    Ok(())
                })?;
                Ok(())
            })?;
        Ok(())
    }
}
