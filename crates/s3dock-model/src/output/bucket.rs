//! Output records for bucket-level operations.

use crate::types::BucketEntry;

/// Output of the ListBuckets operation.
#[derive(Debug, Clone, Default)]
pub struct ListBucketsOutput {
    /// All buckets, sorted by name.
    pub buckets: Vec<BucketEntry>,
}

/// Output of the CreateBucket operation.
#[derive(Debug, Clone)]
pub struct CreateBucketOutput {
    /// The `Location` header value (`/<bucket>`).
    pub location: String,
}

/// Output of the HeadBucket operation.
#[derive(Debug, Clone, Default)]
pub struct HeadBucketOutput {}

/// Output of the GetBucketLocation operation.
#[derive(Debug, Clone, Default)]
pub struct GetBucketLocationOutput {
    /// The location constraint; `None` renders an empty element, which is
    /// how the upstream service spells the default region.
    pub location_constraint: Option<String>,
}

/// Output of the GetBucketAcl operation (canned full-control grant).
#[derive(Debug, Clone)]
pub struct GetBucketAclOutput {
    /// The canned owner id.
    pub owner_id: String,
    /// The canned owner display name.
    pub owner_display_name: String,
}

/// Output of the GetBucketVersioning operation (always unconfigured).
#[derive(Debug, Clone, Default)]
pub struct GetBucketVersioningOutput {}
