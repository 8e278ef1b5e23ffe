//! Output records for bucket configuration and preflights.

use crate::types::{CorsConfiguration, WebsiteConfiguration};

/// Output of the GetBucketCors operation.
#[derive(Debug, Clone)]
pub struct GetBucketCorsOutput {
    /// The stored configuration.
    pub configuration: CorsConfiguration,
}

/// Output of the GetBucketWebsite operation.
#[derive(Debug, Clone)]
pub struct GetBucketWebsiteOutput {
    /// The stored configuration.
    pub configuration: WebsiteConfiguration,
}

/// The grant produced by a matched preflight rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightAllow {
    /// Value for `access-control-allow-origin`.
    pub origin: String,
    /// Values joined into `access-control-allow-methods`.
    pub methods: Vec<String>,
    /// Values joined into `access-control-allow-headers` (lowercased).
    pub headers: Vec<String>,
    /// Value for `access-control-max-age`, when configured.
    pub max_age_seconds: Option<i32>,
}

/// Output of a CORS preflight evaluation.
///
/// `None` means no rule matched: the response is an empty 403 with no CORS
/// headers, not an `<Error>` document.
#[derive(Debug, Clone, Default)]
pub struct PreflightOutput {
    /// The matched grant, if any.
    pub allow: Option<PreflightAllow>,
}
