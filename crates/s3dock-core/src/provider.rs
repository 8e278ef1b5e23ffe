//! The operation provider: one `handle_*` method per operation.
//!
//! [`S3Dock`] owns the filesystem store, the CORS and website indexes, and
//! the event bus. The handler methods themselves live in the `ops` modules,
//! grouped the same way the operations are grouped on the wire.

use std::sync::Arc;

use s3dock_model::types::{CorsConfiguration, WebsiteConfiguration};
use s3dock_xml::XmlError;

use crate::config::{CorsSetting, ServerOptions};
use crate::cors::{CorsIndex, CorsMatch};
use crate::events::EventBus;
use crate::store::FsStore;
use crate::website::WebsiteIndex;

/// The engine behind the HTTP dispatcher.
#[derive(Debug, Clone)]
pub struct S3Dock {
    pub(crate) store: Arc<FsStore>,
    pub(crate) cors: Arc<CorsIndex>,
    pub(crate) website: Arc<WebsiteIndex>,
    pub(crate) events: EventBus,
}

impl S3Dock {
    /// Build a provider from a store and resolved options.
    ///
    /// The `cors` option's XML document, when given, is parsed here once;
    /// a malformed document fails startup rather than every request.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] when the configured CORS document is invalid.
    pub fn from_options(store: Arc<FsStore>, options: &ServerOptions) -> Result<Self, XmlError> {
        let cors_fallback = match &options.cors {
            CorsSetting::Wildcard => Some(CorsIndex::wildcard_configuration()),
            CorsSetting::Disabled => None,
            CorsSetting::Document(xml) => {
                Some(s3dock_xml::from_xml::<CorsConfiguration>(xml.as_bytes())?)
            }
        };

        let website_fallback = options
            .index_document
            .as_ref()
            .map(|index_document| WebsiteConfiguration {
                index_document: index_document.clone(),
                error_document: options.error_document.clone(),
            });

        Ok(Self {
            store,
            cors: Arc::new(CorsIndex::new(cors_fallback)),
            website: Arc::new(WebsiteIndex::new(website_fallback)),
            events: EventBus::new(),
        })
    }

    /// The event bus mutating operations publish to.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &FsStore {
        &self.store
    }

    /// Whether website routing applies to this bucket.
    #[must_use]
    pub fn website_enabled(&self, bucket: &str) -> bool {
        self.website.effective(bucket).is_some()
    }

    /// CORS match for a normal request, used to decorate responses.
    #[must_use]
    pub fn match_cors(&self, bucket: &str, origin: &str, method: &str) -> Option<CorsMatch> {
        self.cors.match_request(bucket, origin, method)
    }
}
