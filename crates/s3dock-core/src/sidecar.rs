//! The metadata sidecar persisted next to every content blob.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Filename suffix appended to a key to form its sidecar path.
pub const SIDECAR_SUFFIX: &str = ".s3dock_meta.json";

/// Content type assigned when an upload does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "binary/octet-stream";

/// The sidecar document. One exists for every persisted object; a blob
/// without one is a consistency violation surfaced as `InternalError`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sidecar {
    /// The stored content type.
    #[serde(rename = "content-type")]
    pub content_type: String,

    /// Pass-through `Content-Encoding`.
    #[serde(rename = "content-encoding", skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub content_encoding: Option<String>,

    /// Pass-through `Content-Disposition`.
    #[serde(
        rename = "content-disposition",
        skip_serializing_if = "Option::is_none"
    )]
    #[serde(default)]
    pub content_disposition: Option<String>,

    /// Pass-through `Cache-Control`.
    #[serde(rename = "cache-control", skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub cache_control: Option<String>,

    /// Pass-through `Expires`.
    #[serde(rename = "expires", skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub expires: Option<String>,

    /// Hex MD5 of the blob, without quotes.
    pub etag: String,

    /// When the object was written, RFC 3339.
    #[serde(rename = "last-modified")]
    pub last_modified: DateTime<Utc>,

    /// User metadata; names are stored lowercased.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Sidecar {
    /// Build a sidecar for a fresh write.
    ///
    /// `content_type` falls back to [`DEFAULT_CONTENT_TYPE`], and metadata
    /// names are lowercased so header-case differences never produce
    /// duplicate keys.
    #[must_use]
    pub fn new(
        content_type: Option<String>,
        etag: String,
        metadata: HashMap<String, String>,
    ) -> Self {
        Self {
            content_type: content_type.unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned()),
            content_encoding: None,
            content_disposition: None,
            cache_control: None,
            expires: None,
            etag,
            last_modified: Utc::now(),
            metadata: metadata
                .into_iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value))
                .collect(),
        }
    }

    /// The etag as rendered on the wire: quoted.
    #[must_use]
    pub fn quoted_etag(&self) -> String {
        format!("\"{}\"", self.etag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_round_trip_through_json() {
        let mut metadata = HashMap::new();
        metadata.insert("owner".to_owned(), "tests".to_owned());
        let mut sidecar = Sidecar::new(
            Some("image/png".to_owned()),
            "d41d8cd98f00b204e9800998ecf8427e".to_owned(),
            metadata,
        );
        sidecar.content_encoding = Some("gzip".to_owned());

        let json = serde_json::to_string(&sidecar).expect("serialize");
        let back: Sidecar = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, sidecar);
    }

    #[test]
    fn test_should_use_wire_field_names() {
        let sidecar = Sidecar::new(None, "abc".to_owned(), HashMap::new());
        let json = serde_json::to_string(&sidecar).expect("serialize");

        assert!(json.contains("\"content-type\""));
        assert!(json.contains("\"last-modified\""));
        assert!(!json.contains("content_type"));
        // Unset optional headers are omitted entirely.
        assert!(!json.contains("content-encoding"));
    }

    #[test]
    fn test_should_default_content_type() {
        let sidecar = Sidecar::new(None, "abc".to_owned(), HashMap::new());
        assert_eq!(sidecar.content_type, DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_should_lowercase_metadata_names() {
        let mut metadata = HashMap::new();
        metadata.insert("X-Mixed-Case".to_owned(), "v".to_owned());
        let sidecar = Sidecar::new(None, "abc".to_owned(), metadata);
        assert_eq!(sidecar.metadata.get("x-mixed-case").map(String::as_str), Some("v"));
    }

    #[test]
    fn test_should_quote_etag_for_the_wire() {
        let sidecar = Sidecar::new(None, "cafebabe".to_owned(), HashMap::new());
        assert_eq!(sidecar.quoted_etag(), "\"cafebabe\"");
    }
}
