//! Parsing the request documents the emulator accepts.

use quick_xml::Reader;
use quick_xml::events::Event;
use s3dock_model::types::{
    CompletedMultipartUpload, CompletedPart, CorsConfiguration, CorsRule, Delete, ObjectIdentifier,
    WebsiteConfiguration,
};

use crate::error::XmlError;

/// Trait for parsing a document from inside its root element.
///
/// The reader is positioned just after the opening tag; implementations read
/// child elements until the matching end tag is consumed.
pub trait S3Deserialize: Sized {
    /// Parse an instance from the reader.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] when the XML is malformed or required elements
    /// are missing.
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError>;
}

/// Parse a complete document into a typed value.
///
/// Skips the declaration, consumes the root element, and delegates to the
/// type's [`S3Deserialize`] implementation.
///
/// # Errors
///
/// Returns [`XmlError`] when the XML is malformed or deserialization fails.
pub fn from_xml<T: S3Deserialize>(xml: &[u8]) -> Result<T, XmlError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(_) => return T::deserialize_xml(&mut reader),
            Event::Eof => return Err(XmlError::MissingField("root element")),
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Reading helpers
// ---------------------------------------------------------------------------

/// Read the text content of the current element through its end tag.
fn read_text(reader: &mut Reader<&[u8]>) -> Result<String, XmlError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                let unescaped = e.unescape().map_err(|err| XmlError::InvalidValue {
                    element: "text",
                    detail: err.to_string(),
                })?;
                text.push_str(&unescaped);
            }
            Event::End(_) => return Ok(text),
            Event::Eof => return Err(XmlError::MissingField("closing tag")),
            _ => {}
        }
    }
}

/// Skip the current element and everything inside it.
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<(), XmlError> {
    let mut depth: u32 = 1;
    loop {
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => return Err(XmlError::MissingField("closing tag")),
            _ => {}
        }
    }
}

/// Decode an element name into a UTF-8 string slice.
fn element_name(raw: &[u8]) -> Result<String, XmlError> {
    std::str::from_utf8(raw)
        .map(ToOwned::to_owned)
        .map_err(|e| XmlError::InvalidValue {
            element: "name",
            detail: e.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Request documents
// ---------------------------------------------------------------------------

impl S3Deserialize for CorsRule {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut rule = CorsRule::default();
        loop {
            match reader.read_event()? {
                Event::Start(e) => match element_name(e.name().as_ref())?.as_str() {
                    "AllowedOrigin" => rule.allowed_origins.push(read_text(reader)?),
                    "AllowedMethod" => rule.allowed_methods.push(read_text(reader)?),
                    "AllowedHeader" => rule.allowed_headers.push(read_text(reader)?),
                    "ExposeHeader" => rule.expose_headers.push(read_text(reader)?),
                    "MaxAgeSeconds" => {
                        let text = read_text(reader)?;
                        let value = text.parse::<i32>().map_err(|e| XmlError::InvalidValue {
                            element: "MaxAgeSeconds",
                            detail: e.to_string(),
                        })?;
                        rule.max_age_seconds = Some(value);
                    }
                    _ => skip_element(reader)?,
                },
                Event::End(_) => break,
                Event::Eof => return Err(XmlError::MissingField("CORSRule")),
                _ => {}
            }
        }
        if rule.allowed_origins.is_empty() {
            return Err(XmlError::MissingField("AllowedOrigin"));
        }
        if rule.allowed_methods.is_empty() {
            return Err(XmlError::MissingField("AllowedMethod"));
        }
        Ok(rule)
    }
}

impl S3Deserialize for CorsConfiguration {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut rules = Vec::new();
        loop {
            match reader.read_event()? {
                Event::Start(e) => match element_name(e.name().as_ref())?.as_str() {
                    "CORSRule" => rules.push(CorsRule::deserialize_xml(reader)?),
                    _ => skip_element(reader)?,
                },
                Event::End(_) => break,
                Event::Eof => return Err(XmlError::MissingField("CORSConfiguration")),
                _ => {}
            }
        }
        if rules.is_empty() {
            return Err(XmlError::MissingField("CORSRule"));
        }
        Ok(Self { rules })
    }
}

impl S3Deserialize for WebsiteConfiguration {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut index_document = None;
        let mut error_document = None;
        loop {
            match reader.read_event()? {
                Event::Start(e) => match element_name(e.name().as_ref())?.as_str() {
                    "IndexDocument" => {
                        index_document = Some(read_named_child(reader, "Suffix")?);
                    }
                    "ErrorDocument" => {
                        error_document = Some(read_named_child(reader, "Key")?);
                    }
                    _ => skip_element(reader)?,
                },
                Event::End(_) => break,
                Event::Eof => return Err(XmlError::MissingField("WebsiteConfiguration")),
                _ => {}
            }
        }
        Ok(Self {
            index_document: index_document.ok_or(XmlError::MissingField("IndexDocument"))?,
            error_document,
        })
    }
}

/// Read a container element expected to hold exactly one named text child,
/// e.g. `<IndexDocument><Suffix>index.html</Suffix></IndexDocument>`.
fn read_named_child(reader: &mut Reader<&[u8]>, child: &'static str) -> Result<String, XmlError> {
    let mut value = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if element_name(e.name().as_ref())? == child {
                    value = Some(read_text(reader)?);
                } else {
                    skip_element(reader)?;
                }
            }
            Event::End(_) => break,
            Event::Eof => return Err(XmlError::MissingField(child)),
            _ => {}
        }
    }
    value.ok_or(XmlError::MissingField(child))
}

impl S3Deserialize for ObjectIdentifier {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut key = None;
        loop {
            match reader.read_event()? {
                Event::Start(e) => match element_name(e.name().as_ref())?.as_str() {
                    "Key" => key = Some(read_text(reader)?),
                    _ => skip_element(reader)?,
                },
                Event::End(_) => break,
                Event::Eof => return Err(XmlError::MissingField("Object")),
                _ => {}
            }
        }
        Ok(Self {
            key: key.ok_or(XmlError::MissingField("Key"))?,
        })
    }
}

impl S3Deserialize for Delete {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut objects = Vec::new();
        let mut quiet = false;
        loop {
            match reader.read_event()? {
                Event::Start(e) => match element_name(e.name().as_ref())?.as_str() {
                    "Object" => objects.push(ObjectIdentifier::deserialize_xml(reader)?),
                    "Quiet" => {
                        quiet = read_text(reader)? == "true";
                    }
                    _ => skip_element(reader)?,
                },
                Event::End(_) => break,
                Event::Eof => return Err(XmlError::MissingField("Delete")),
                _ => {}
            }
        }
        Ok(Self { objects, quiet })
    }
}

impl S3Deserialize for CompletedPart {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut part_number = None;
        let mut etag = None;
        loop {
            match reader.read_event()? {
                Event::Start(e) => match element_name(e.name().as_ref())?.as_str() {
                    "PartNumber" => {
                        let text = read_text(reader)?;
                        let value = text.parse::<u32>().map_err(|e| XmlError::InvalidValue {
                            element: "PartNumber",
                            detail: e.to_string(),
                        })?;
                        part_number = Some(value);
                    }
                    "ETag" => etag = Some(read_text(reader)?),
                    _ => skip_element(reader)?,
                },
                Event::End(_) => break,
                Event::Eof => return Err(XmlError::MissingField("Part")),
                _ => {}
            }
        }
        Ok(Self {
            part_number: part_number.ok_or(XmlError::MissingField("PartNumber"))?,
            etag,
        })
    }
}

impl S3Deserialize for CompletedMultipartUpload {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut parts = Vec::new();
        loop {
            match reader.read_event()? {
                Event::Start(e) => match element_name(e.name().as_ref())?.as_str() {
                    "Part" => parts.push(CompletedPart::deserialize_xml(reader)?),
                    _ => skip_element(reader)?,
                },
                Event::End(_) => break,
                Event::Eof => return Err(XmlError::MissingField("CompleteMultipartUpload")),
                _ => {}
            }
        }
        Ok(Self { parts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parse_cors_configuration() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
            <CORSConfiguration xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
              <CORSRule>
                <AllowedOrigin>https://example.com</AllowedOrigin>
                <AllowedOrigin>https://*.trusted.test</AllowedOrigin>
                <AllowedMethod>GET</AllowedMethod>
                <AllowedMethod>PUT</AllowedMethod>
                <AllowedHeader>*</AllowedHeader>
                <ExposeHeader>ETag</ExposeHeader>
                <MaxAgeSeconds>3000</MaxAgeSeconds>
              </CORSRule>
            </CORSConfiguration>"#;

        let config: CorsConfiguration = from_xml(xml).expect("should parse");
        assert_eq!(config.rules.len(), 1);
        let rule = &config.rules[0];
        assert_eq!(rule.allowed_origins.len(), 2);
        assert_eq!(rule.allowed_methods, vec!["GET", "PUT"]);
        assert_eq!(rule.allowed_headers, vec!["*"]);
        assert_eq!(rule.expose_headers, vec!["ETag"]);
        assert_eq!(rule.max_age_seconds, Some(3000));
    }

    #[test]
    fn test_should_reject_cors_rule_without_origin() {
        let xml = br#"<CORSConfiguration>
              <CORSRule><AllowedMethod>GET</AllowedMethod></CORSRule>
            </CORSConfiguration>"#;

        let result: Result<CorsConfiguration, _> = from_xml(xml);
        assert!(result.is_err());
    }

    #[test]
    fn test_should_parse_website_configuration() {
        let xml = br#"<WebsiteConfiguration xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
              <IndexDocument><Suffix>index.html</Suffix></IndexDocument>
              <ErrorDocument><Key>error.html</Key></ErrorDocument>
            </WebsiteConfiguration>"#;

        let config: WebsiteConfiguration = from_xml(xml).expect("should parse");
        assert_eq!(config.index_document, "index.html");
        assert_eq!(config.error_document.as_deref(), Some("error.html"));
    }

    #[test]
    fn test_should_parse_website_configuration_without_error_document() {
        let xml = br#"<WebsiteConfiguration>
              <IndexDocument><Suffix>home.html</Suffix></IndexDocument>
            </WebsiteConfiguration>"#;

        let config: WebsiteConfiguration = from_xml(xml).expect("should parse");
        assert_eq!(config.index_document, "home.html");
        assert!(config.error_document.is_none());
    }

    #[test]
    fn test_should_parse_bulk_delete_document() {
        let xml = br#"<Delete>
              <Object><Key>a.txt</Key></Object>
              <Object><Key>nested/b.txt</Key></Object>
              <Quiet>true</Quiet>
            </Delete>"#;

        let delete: Delete = from_xml(xml).expect("should parse");
        assert_eq!(delete.objects.len(), 2);
        assert_eq!(delete.objects[1].key, "nested/b.txt");
        assert!(delete.quiet);
    }

    #[test]
    fn test_should_parse_complete_multipart_upload() {
        let xml = br#"<CompleteMultipartUpload>
              <Part><PartNumber>1</PartNumber><ETag>"aaa"</ETag></Part>
              <Part><PartNumber>2</PartNumber><ETag>"bbb"</ETag></Part>
            </CompleteMultipartUpload>"#;

        let upload: CompletedMultipartUpload = from_xml(xml).expect("should parse");
        assert_eq!(upload.parts.len(), 2);
        assert_eq!(upload.parts[0].part_number, 1);
        assert_eq!(upload.parts[1].etag.as_deref(), Some("\"bbb\""));
    }

    #[test]
    fn test_should_unescape_entity_references_in_keys() {
        let xml = br"<Delete><Object><Key>a&amp;b.txt</Key></Object></Delete>";
        let delete: Delete = from_xml(xml).expect("should parse");
        assert_eq!(delete.objects[0].key, "a&b.txt");
    }

    #[test]
    fn test_should_reject_empty_input() {
        let result: Result<Delete, _> = from_xml(b"");
        assert!(result.is_err());
    }
}
