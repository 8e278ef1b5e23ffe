//! Stored bucket configuration: CORS and website, plus preflights.

use s3dock_model::input::{
    DeleteBucketCorsInput, DeleteBucketWebsiteInput, GetBucketCorsInput, GetBucketWebsiteInput,
    PreflightInput, PutBucketCorsInput, PutBucketWebsiteInput,
};
use s3dock_model::output::{GetBucketCorsOutput, GetBucketWebsiteOutput, PreflightOutput};
use s3dock_model::{S3Error, S3ErrorCode};
use tracing::debug;

use crate::provider::S3Dock;

impl S3Dock {
    /// Read the bucket's stored CORS configuration.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`; `NoSuchCORSConfiguration` when none was stored.
    pub async fn handle_get_bucket_cors(
        &self,
        input: GetBucketCorsInput,
    ) -> Result<GetBucketCorsOutput, S3Error> {
        self.require_bucket(&input.bucket)?;
        self.cors
            .get(&input.bucket)
            .map(|configuration| GetBucketCorsOutput { configuration })
            .ok_or_else(|| {
                S3Error::new(S3ErrorCode::NoSuchCORSConfiguration).with_resource(input.bucket)
            })
    }

    /// Store a CORS configuration for the bucket.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub async fn handle_put_bucket_cors(&self, input: PutBucketCorsInput) -> Result<(), S3Error> {
        self.require_bucket(&input.bucket)?;
        debug!(
            bucket = %input.bucket,
            rules = input.configuration.rules.len(),
            "stored CORS configuration"
        );
        self.cors.set(&input.bucket, input.configuration);
        Ok(())
    }

    /// Drop the bucket's CORS configuration.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub async fn handle_delete_bucket_cors(
        &self,
        input: DeleteBucketCorsInput,
    ) -> Result<(), S3Error> {
        self.require_bucket(&input.bucket)?;
        self.cors.delete(&input.bucket);
        Ok(())
    }

    /// Read the bucket's stored website configuration.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`; `NoSuchWebsiteConfiguration` when none was stored.
    pub async fn handle_get_bucket_website(
        &self,
        input: GetBucketWebsiteInput,
    ) -> Result<GetBucketWebsiteOutput, S3Error> {
        self.require_bucket(&input.bucket)?;
        self.website
            .get(&input.bucket)
            .map(|configuration| GetBucketWebsiteOutput { configuration })
            .ok_or_else(|| {
                S3Error::new(S3ErrorCode::NoSuchWebsiteConfiguration).with_resource(input.bucket)
            })
    }

    /// Store a website configuration for the bucket.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub async fn handle_put_bucket_website(
        &self,
        input: PutBucketWebsiteInput,
    ) -> Result<(), S3Error> {
        self.require_bucket(&input.bucket)?;
        debug!(
            bucket = %input.bucket,
            index = %input.configuration.index_document,
            "stored website configuration"
        );
        self.website.set(&input.bucket, input.configuration);
        Ok(())
    }

    /// Drop the bucket's website configuration.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub async fn handle_delete_bucket_website(
        &self,
        input: DeleteBucketWebsiteInput,
    ) -> Result<(), S3Error> {
        self.require_bucket(&input.bucket)?;
        self.website.delete(&input.bucket);
        Ok(())
    }

    /// Evaluate a CORS preflight.
    ///
    /// Never errors: a denied preflight is an empty 403, which the response
    /// layer renders from `allow: None`. Bucket existence is deliberately
    /// not checked so preflights cannot probe for buckets.
    pub async fn handle_preflight(&self, input: PreflightInput) -> Result<PreflightOutput, S3Error> {
        let allow = self.cors.match_preflight(
            &input.bucket,
            &input.origin,
            &input.request_method,
            &input.request_headers,
        );
        Ok(PreflightOutput { allow })
    }
}
