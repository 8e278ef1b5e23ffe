//! Input records for the listing operations.

/// Input for the ListObjects (v1) operation.
#[derive(Debug, Clone, Default)]
pub struct ListObjectsInput {
    /// The bucket to list.
    pub bucket: String,
    /// Only keys starting with this prefix are returned.
    pub prefix: Option<String>,
    /// Keys lexicographically at or before the marker are skipped.
    pub marker: Option<String>,
    /// Groups keys sharing a prefix up to this delimiter.
    pub delimiter: Option<String>,
    /// Maximum number of entries in the response.
    pub max_keys: Option<usize>,
}

/// Input for the ListObjectsV2 operation.
#[derive(Debug, Clone, Default)]
pub struct ListObjectsV2Input {
    /// The bucket to list.
    pub bucket: String,
    /// Only keys starting with this prefix are returned.
    pub prefix: Option<String>,
    /// Keys at or before this value are skipped.
    pub start_after: Option<String>,
    /// Opaque continuation token from a previous truncated response.
    pub continuation_token: Option<String>,
    /// Groups keys sharing a prefix up to this delimiter.
    pub delimiter: Option<String>,
    /// Maximum number of entries in the response.
    pub max_keys: Option<usize>,
}
