//! The listing operations, v1 and v2.

use base64::Engine;
use s3dock_model::input::{ListObjectsInput, ListObjectsV2Input};
use s3dock_model::output::{ListObjectsOutput, ListObjectsV2Output};
use s3dock_model::{S3Error, S3ErrorCode};
use tracing::debug;

use crate::listing::{ListQuery, paginate};
use crate::provider::S3Dock;

impl S3Dock {
    /// List objects, v1 flavour (`marker`/`NextMarker`).
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`; `InternalError` on filesystem failures.
    pub async fn handle_list_objects(
        &self,
        input: ListObjectsInput,
    ) -> Result<ListObjectsOutput, S3Error> {
        let query = ListQuery::new(
            input.prefix.as_deref(),
            input.marker.as_deref(),
            input.delimiter.as_deref(),
            input.max_keys,
        );
        let keys = self
            .store
            .collect_keys(&input.bucket, &query.prefix)
            .await?;
        let outcome = paginate(&keys, &query);
        let contents = self.store.summarize(&input.bucket, &outcome.keys).await?;

        debug!(
            bucket = %input.bucket,
            prefix = %query.prefix,
            count = contents.len(),
            is_truncated = outcome.is_truncated,
            "list_objects completed"
        );

        Ok(ListObjectsOutput {
            name: input.bucket,
            prefix: input.prefix,
            marker: input.marker,
            delimiter: input.delimiter,
            max_keys: query.max_keys,
            is_truncated: outcome.is_truncated,
            next_marker: outcome.next_marker,
            contents,
            common_prefixes: outcome.common_prefixes,
        })
    }

    /// List objects, v2 flavour (continuation tokens, `KeyCount`).
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`; `InvalidArgument` for an undecodable continuation
    /// token; `InternalError` on filesystem failures.
    pub async fn handle_list_objects_v2(
        &self,
        input: ListObjectsV2Input,
    ) -> Result<ListObjectsV2Output, S3Error> {
        let resume_from = match &input.continuation_token {
            Some(token) => Some(decode_continuation_token(token)?),
            None => None,
        };
        let marker = resume_from.as_deref().or(input.start_after.as_deref());

        let query = ListQuery::new(
            input.prefix.as_deref(),
            marker,
            input.delimiter.as_deref(),
            input.max_keys,
        );
        let keys = self
            .store
            .collect_keys(&input.bucket, &query.prefix)
            .await?;
        let outcome = paginate(&keys, &query);
        let contents = self.store.summarize(&input.bucket, &outcome.keys).await?;
        let key_count = contents.len() + outcome.common_prefixes.len();

        debug!(
            bucket = %input.bucket,
            prefix = %query.prefix,
            key_count,
            is_truncated = outcome.is_truncated,
            "list_objects_v2 completed"
        );

        Ok(ListObjectsV2Output {
            name: input.bucket,
            prefix: input.prefix,
            start_after: input.start_after,
            continuation_token: input.continuation_token,
            delimiter: input.delimiter,
            max_keys: query.max_keys,
            key_count,
            is_truncated: outcome.is_truncated,
            next_continuation_token: outcome
                .next_marker
                .as_deref()
                .map(encode_continuation_token),
            contents,
            common_prefixes: outcome.common_prefixes,
        })
    }
}

/// Continuation tokens are opaque on the wire; ours are base64 of the key.
fn encode_continuation_token(key: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(key)
}

fn decode_continuation_token(token: &str) -> Result<String, S3Error> {
    base64::engine::general_purpose::STANDARD
        .decode(token)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(|| {
            S3Error::with_message(
                S3ErrorCode::InvalidArgument,
                "The continuation token provided is incorrect",
            )
        })
}
