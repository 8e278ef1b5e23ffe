//! Bucket CRUD and the canned bucket sub-resource reads.

use s3dock_model::input::{
    CreateBucketInput, DeleteBucketInput, GetBucketAclInput, GetBucketLocationInput,
    GetBucketPolicyInput, GetBucketVersioningInput, HeadBucketInput, ListBucketsInput,
};
use s3dock_model::output::{
    CreateBucketOutput, GetBucketAclOutput, GetBucketLocationOutput, GetBucketVersioningOutput,
    HeadBucketOutput, ListBucketsOutput,
};
use s3dock_model::{S3Error, S3ErrorCode};
use tracing::debug;

use crate::provider::S3Dock;

/// Canned owner identity used in ACL and listing documents.
pub(crate) const CANNED_OWNER: &str = "s3dock";

impl S3Dock {
    /// List all buckets.
    ///
    /// # Errors
    ///
    /// `InternalError` on filesystem failures.
    pub async fn handle_list_buckets(
        &self,
        _input: ListBucketsInput,
    ) -> Result<ListBucketsOutput, S3Error> {
        let buckets = self.store.list_buckets().await?;
        debug!(count = buckets.len(), "listed buckets");
        Ok(ListBucketsOutput { buckets })
    }

    /// Create a bucket; creating an existing bucket succeeds.
    ///
    /// # Errors
    ///
    /// `InvalidBucketName`, `BucketAlreadyExists`.
    pub async fn handle_create_bucket(
        &self,
        input: CreateBucketInput,
    ) -> Result<CreateBucketOutput, S3Error> {
        self.store.create_bucket(&input.bucket).await?;
        Ok(CreateBucketOutput {
            location: format!("/{}", input.bucket),
        })
    }

    /// Delete an empty bucket.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, `BucketNotEmpty`.
    pub async fn handle_delete_bucket(&self, input: DeleteBucketInput) -> Result<(), S3Error> {
        self.store.delete_bucket(&input.bucket).await?;
        // Dropping the bucket also drops its per-bucket configuration.
        self.cors.delete(&input.bucket);
        self.website.delete(&input.bucket);
        Ok(())
    }

    /// Existence probe.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub async fn handle_head_bucket(
        &self,
        input: HeadBucketInput,
    ) -> Result<HeadBucketOutput, S3Error> {
        self.require_bucket(&input.bucket)?;
        Ok(HeadBucketOutput {})
    }

    /// Canned location: the default region renders as an empty constraint.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub async fn handle_get_bucket_location(
        &self,
        input: GetBucketLocationInput,
    ) -> Result<GetBucketLocationOutput, S3Error> {
        self.require_bucket(&input.bucket)?;
        Ok(GetBucketLocationOutput {
            location_constraint: None,
        })
    }

    /// Canned ACL: a single FULL_CONTROL grant for the fixed owner.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub async fn handle_get_bucket_acl(
        &self,
        input: GetBucketAclInput,
    ) -> Result<GetBucketAclOutput, S3Error> {
        self.require_bucket(&input.bucket)?;
        Ok(GetBucketAclOutput {
            owner_id: CANNED_OWNER.to_owned(),
            owner_display_name: CANNED_OWNER.to_owned(),
        })
    }

    /// Policies are never stored, so reads always answer the canned 404.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, `NoSuchBucketPolicy`.
    pub async fn handle_get_bucket_policy(&self, input: GetBucketPolicyInput) -> Result<(), S3Error> {
        self.require_bucket(&input.bucket)?;
        Err(S3Error::new(S3ErrorCode::NoSuchBucketPolicy).with_resource(input.bucket))
    }

    /// Versioning is out of scope; the canned answer is "unconfigured".
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub async fn handle_get_bucket_versioning(
        &self,
        input: GetBucketVersioningInput,
    ) -> Result<GetBucketVersioningOutput, S3Error> {
        self.require_bucket(&input.bucket)?;
        Ok(GetBucketVersioningOutput {})
    }

    /// Shared existence check for handlers that only need the bucket.
    pub(crate) fn require_bucket(&self, bucket: &str) -> Result<(), S3Error> {
        if self.store.bucket_exists(bucket) {
            Ok(())
        } else {
            Err(S3Error::no_such_bucket(bucket))
        }
    }
}
