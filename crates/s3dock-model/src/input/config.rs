//! Input records for bucket configuration (CORS, website) and preflights.

use crate::types::{CorsConfiguration, WebsiteConfiguration};

/// Input for the GetBucketCors operation.
#[derive(Debug, Clone)]
pub struct GetBucketCorsInput {
    /// The bucket whose CORS configuration is requested.
    pub bucket: String,
}

/// Input for the PutBucketCors operation.
#[derive(Debug, Clone)]
pub struct PutBucketCorsInput {
    /// The bucket to configure.
    pub bucket: String,
    /// The parsed `CORSConfiguration` document.
    pub configuration: CorsConfiguration,
}

/// Input for the DeleteBucketCors operation.
#[derive(Debug, Clone)]
pub struct DeleteBucketCorsInput {
    /// The bucket whose CORS configuration is removed.
    pub bucket: String,
}

/// Input for the GetBucketWebsite operation.
#[derive(Debug, Clone)]
pub struct GetBucketWebsiteInput {
    /// The bucket whose website configuration is requested.
    pub bucket: String,
}

/// Input for the PutBucketWebsite operation.
#[derive(Debug, Clone)]
pub struct PutBucketWebsiteInput {
    /// The bucket to configure.
    pub bucket: String,
    /// The parsed `WebsiteConfiguration` document.
    pub configuration: WebsiteConfiguration,
}

/// Input for the DeleteBucketWebsite operation.
#[derive(Debug, Clone)]
pub struct DeleteBucketWebsiteInput {
    /// The bucket whose website configuration is removed.
    pub bucket: String,
}

/// Input for a CORS preflight (`OPTIONS` + `Access-Control-Request-Method`).
#[derive(Debug, Clone)]
pub struct PreflightInput {
    /// The target bucket.
    pub bucket: String,
    /// The request `Origin` header.
    pub origin: String,
    /// The method named by `Access-Control-Request-Method`.
    pub request_method: String,
    /// Headers named by `Access-Control-Request-Headers`, split on commas.
    pub request_headers: Vec<String>,
}
