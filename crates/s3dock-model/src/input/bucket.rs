//! Input records for bucket-level operations.

/// Input for the ListBuckets operation.
#[derive(Debug, Clone, Default)]
pub struct ListBucketsInput {}

/// Input for the CreateBucket operation.
#[derive(Debug, Clone)]
pub struct CreateBucketInput {
    /// The bucket to create.
    pub bucket: String,
}

/// Input for the DeleteBucket operation.
#[derive(Debug, Clone)]
pub struct DeleteBucketInput {
    /// The bucket to delete.
    pub bucket: String,
}

/// Input for the HeadBucket operation.
#[derive(Debug, Clone)]
pub struct HeadBucketInput {
    /// The bucket to probe.
    pub bucket: String,
}

/// Input for the GetBucketLocation operation.
#[derive(Debug, Clone)]
pub struct GetBucketLocationInput {
    /// The bucket whose location is requested.
    pub bucket: String,
}

/// Input for the GetBucketAcl operation.
#[derive(Debug, Clone)]
pub struct GetBucketAclInput {
    /// The bucket whose ACL is requested.
    pub bucket: String,
}

/// Input for the GetBucketPolicy operation.
#[derive(Debug, Clone)]
pub struct GetBucketPolicyInput {
    /// The bucket whose policy is requested.
    pub bucket: String,
}

/// Input for the GetBucketVersioning operation.
#[derive(Debug, Clone)]
pub struct GetBucketVersioningInput {
    /// The bucket whose versioning state is requested.
    pub bucket: String,
}
