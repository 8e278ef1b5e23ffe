//! Codec errors and the `<Error>` response document.

use std::io;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};
use s3dock_model::S3Error;

/// Errors produced while encoding or decoding S3 XML documents.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An I/O error from the underlying writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document could not be parsed at all.
    #[error("XML processing error: {0}")]
    Malformed(#[from] quick_xml::Error),

    /// A required element was absent from an otherwise well-formed document.
    #[error("missing required XML element: {0}")]
    MissingField(&'static str),

    /// An element's text content could not be interpreted.
    #[error("invalid value for <{element}>: {detail}")]
    InvalidValue {
        /// The element whose content was rejected.
        element: &'static str,
        /// What went wrong.
        detail: String,
    },
}

/// Render an [`S3Error`] as the flat `<Error>` document the service uses
/// (there is no outer `<ErrorResponse>` wrapper).
///
/// The error's internal `source` is never included; only `Code`, `Message`,
/// `Resource` (when known), and `RequestId` reach the client.
#[must_use]
pub fn render_error_document(err: &S3Error, request_id: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256);
    if let Err(write_err) = write_error(&mut buf, err, request_id) {
        // A Vec<u8> sink cannot fail; reaching this means a logic error in
        // the writer itself. Fall back to an empty body rather than panic.
        tracing::error!(error = %write_err, "failed to render error document");
        buf.clear();
    }
    buf
}

fn write_error(buf: &mut Vec<u8>, err: &S3Error, request_id: &str) -> io::Result<()> {
    let mut writer = Writer::new(buf);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.create_element("Error").write_inner_content(|w| {
        w.create_element("Code")
            .write_text_content(BytesText::new(err.code.as_str()))?;
        w.create_element("Message")
            .write_text_content(BytesText::new(&err.message))?;
        if let Some(resource) = err.resource.as_deref() {
            w.create_element("Resource")
                .write_text_content(BytesText::new(resource))?;
        }
        w.create_element("RequestId")
            .write_text_content(BytesText::new(request_id))?;
        Ok(())
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use s3dock_model::S3ErrorCode;

    use super::*;

    #[test]
    fn test_should_render_error_with_resource() {
        let err = S3Error::no_such_bucket("mybucket");
        let xml = render_error_document(&err, "req-001");
        let text = std::str::from_utf8(&xml).expect("valid UTF-8");

        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains("<Code>NoSuchBucket</Code>"));
        assert!(text.contains("<Message>The specified bucket does not exist</Message>"));
        assert!(text.contains("<Resource>mybucket</Resource>"));
        assert!(text.contains("<RequestId>req-001</RequestId>"));
    }

    #[test]
    fn test_should_omit_resource_when_unknown() {
        let err = S3Error::internal_error("disk failure");
        let xml = render_error_document(&err, "req-002");
        let text = std::str::from_utf8(&xml).expect("valid UTF-8");

        assert!(!text.contains("<Resource>"));
        assert!(text.contains("<Code>InternalError</Code>"));
    }

    #[test]
    fn test_should_escape_markup_in_message() {
        let err = S3Error::with_message(S3ErrorCode::InvalidArgument, "value must be < 10 & > 0");
        let xml = render_error_document(&err, "req-003");
        let text = std::str::from_utf8(&xml).expect("valid UTF-8");

        assert!(text.contains("value must be &lt; 10 &amp; &gt; 0"));
    }
}
