//! Output records for the listing operations.

use crate::types::ObjectSummary;

/// Output of the ListObjects (v1) operation, rendered as `ListBucketResult`.
#[derive(Debug, Clone, Default)]
pub struct ListObjectsOutput {
    /// The bucket name.
    pub name: String,
    /// The request prefix, echoed back.
    pub prefix: Option<String>,
    /// The request marker, echoed back.
    pub marker: Option<String>,
    /// The request delimiter, echoed back.
    pub delimiter: Option<String>,
    /// The effective max-keys value.
    pub max_keys: usize,
    /// Whether the listing was truncated.
    pub is_truncated: bool,
    /// The marker to resume from, present only when truncated.
    pub next_marker: Option<String>,
    /// Matching objects in key order.
    pub contents: Vec<ObjectSummary>,
    /// Grouped common prefixes, each ending with the delimiter.
    pub common_prefixes: Vec<String>,
}

/// Output of the ListObjectsV2 operation.
#[derive(Debug, Clone, Default)]
pub struct ListObjectsV2Output {
    /// The bucket name.
    pub name: String,
    /// The request prefix, echoed back.
    pub prefix: Option<String>,
    /// The request start-after, echoed back.
    pub start_after: Option<String>,
    /// The request continuation token, echoed back.
    pub continuation_token: Option<String>,
    /// The request delimiter, echoed back.
    pub delimiter: Option<String>,
    /// The effective max-keys value.
    pub max_keys: usize,
    /// Number of keys plus common prefixes in this response.
    pub key_count: usize,
    /// Whether the listing was truncated.
    pub is_truncated: bool,
    /// The token to resume from, present only when truncated.
    pub next_continuation_token: Option<String>,
    /// Matching objects in key order.
    pub contents: Vec<ObjectSummary>,
    /// Grouped common prefixes, each ending with the delimiter.
    pub common_prefixes: Vec<String>,
}
