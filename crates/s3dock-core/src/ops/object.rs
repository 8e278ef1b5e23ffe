//! Object reads, writes, copies, and deletes.

use s3dock_model::input::{
    CopyObjectInput, DeleteObjectInput, DeleteObjectsInput, GetObjectInput, HeadObjectInput,
    PutObjectInput,
};
use s3dock_model::output::{
    CopyObjectOutput, DeleteObjectsOutput, GetObjectOutput, HeadObjectOutput, ObjectHeaders,
    PutObjectOutput,
};
use s3dock_model::types::{DeleteError, DeletedObject, MetadataDirective};
use s3dock_model::{S3Error, S3ErrorCode};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::events::{EventName, EventRecord};
use crate::provider::S3Dock;
use crate::sidecar::Sidecar;
use crate::validation::parse_copy_source;

/// Content type applied on a REPLACE copy when the request names none.
const REPLACE_DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

impl S3Dock {
    /// Store an object and publish `ObjectCreated:Put`.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, key validation failures, `InvalidDigest`.
    pub async fn handle_put_object(
        &self,
        input: PutObjectInput,
    ) -> Result<PutObjectOutput, S3Error> {
        let mut sidecar = Sidecar::new(input.content_type, String::new(), input.metadata);
        sidecar.content_encoding = input.content_encoding;
        sidecar.content_disposition = input.content_disposition;
        sidecar.cache_control = input.cache_control;
        sidecar.expires = input.expires;

        let (stored, size) = self
            .store
            .put_object(
                &input.bucket,
                &input.key,
                input.body,
                input.content_md5.as_deref(),
                sidecar,
            )
            .await?;

        self.events.publish(&EventRecord {
            event_name: EventName::ObjectCreatedPut,
            bucket_name: input.bucket.clone(),
            object_key: input.key.clone(),
            object_size: Some(size),
            object_etag: Some(stored.etag.clone()),
        });

        debug!(bucket = %input.bucket, key = %input.key, size, "put object");
        Ok(PutObjectOutput {
            etag: stored.quoted_etag(),
        })
    }

    /// Read an object, optionally a byte range of it.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`/`NoSuchKey`, `InvalidRange` (416).
    pub async fn handle_get_object(
        &self,
        input: GetObjectInput,
    ) -> Result<GetObjectOutput, S3Error> {
        let read = self
            .store
            .get_object(&input.bucket, &input.key, input.range.as_deref())
            .await?;

        let headers = object_headers(&read.sidecar, read.body.len() as u64);
        let content_range = read
            .range
            .map(|(start, end)| format!("bytes {start}-{end}/{}", read.total_size));

        Ok(GetObjectOutput {
            headers,
            body: read.body,
            content_range,
        })
    }

    /// Object attributes without the body.
    ///
    /// # Errors
    ///
    /// As for [`handle_get_object`](Self::handle_get_object).
    pub async fn handle_head_object(
        &self,
        input: HeadObjectInput,
    ) -> Result<HeadObjectOutput, S3Error> {
        let stat = self
            .store
            .stat_object(&input.bucket, &input.key, input.range.as_deref())
            .await?;

        let content_length = match stat.range {
            Some((start, end)) => end - start + 1,
            None => stat.total_size,
        };
        let headers = object_headers(&stat.sidecar, content_length);
        let content_range = stat
            .range
            .map(|(start, end)| format!("bytes {start}-{end}/{}", stat.total_size));

        Ok(HeadObjectOutput {
            headers,
            content_range,
        })
    }

    /// Copy an object and publish `ObjectCreated:Copy`.
    ///
    /// With the default `COPY` directive the destination inherits the
    /// source's metadata and system headers verbatim; `REPLACE` takes both
    /// from the request. A copy onto itself without `REPLACE` is rejected.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`/`NoSuchKey` for the source or destination,
    /// `InvalidRequest` for a self-copy without `REPLACE`.
    pub async fn handle_copy_object(
        &self,
        input: CopyObjectInput,
    ) -> Result<CopyObjectOutput, S3Error> {
        let (source_bucket, source_key) = parse_copy_source(&input.copy_source)?;

        if source_bucket == input.bucket
            && source_key == input.key
            && input.metadata_directive == MetadataDirective::Copy
        {
            return Err(S3Error::invalid_request(
                "This copy request is illegal because it is trying to copy an object to itself \
                 without changing the object's metadata",
            ));
        }

        let source = self
            .store
            .get_object(&source_bucket, &source_key, None)
            .await?;

        let sidecar = match input.metadata_directive {
            MetadataDirective::Copy => {
                // Everything but the write instant carries over.
                let mut sidecar = source.sidecar.clone();
                sidecar.etag = String::new();
                sidecar
            }
            MetadataDirective::Replace => Sidecar::new(
                Some(
                    input
                        .content_type
                        .unwrap_or_else(|| REPLACE_DEFAULT_CONTENT_TYPE.to_owned()),
                ),
                String::new(),
                input.metadata,
            ),
        };

        let (stored, size) = self
            .store
            .put_object(&input.bucket, &input.key, source.body, None, sidecar)
            .await?;

        self.events.publish(&EventRecord {
            event_name: EventName::ObjectCreatedCopy,
            bucket_name: input.bucket.clone(),
            object_key: input.key.clone(),
            object_size: Some(size),
            object_etag: Some(stored.etag.clone()),
        });

        debug!(
            source_bucket = %source_bucket,
            source_key = %source_key,
            bucket = %input.bucket,
            key = %input.key,
            "copied object"
        );
        Ok(CopyObjectOutput {
            etag: stored.quoted_etag(),
            last_modified: stored.last_modified,
        })
    }

    /// Delete an object; absence is not an error. Publishes
    /// `ObjectRemoved:Delete` only when something was removed.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub async fn handle_delete_object(&self, input: DeleteObjectInput) -> Result<(), S3Error> {
        let removed = self.store.delete_object(&input.bucket, &input.key).await?;
        if removed {
            self.events.publish(&EventRecord {
                event_name: EventName::ObjectRemovedDelete,
                bucket_name: input.bucket,
                object_key: input.key,
                object_size: None,
                object_etag: None,
            });
        }
        Ok(())
    }

    /// Bulk delete. Every requested key lands in `Deleted` — present or
    /// not — and only real I/O failures produce `Errors` entries.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` when the bucket itself is absent.
    pub async fn handle_delete_objects(
        &self,
        input: DeleteObjectsInput,
    ) -> Result<DeleteObjectsOutput, S3Error> {
        self.require_bucket(&input.bucket)?;

        let mut output = DeleteObjectsOutput::default();
        for object in input.delete.objects {
            match self.store.delete_object(&input.bucket, &object.key).await {
                Ok(removed) => {
                    if removed {
                        self.events.publish(&EventRecord {
                            event_name: EventName::ObjectRemovedDelete,
                            bucket_name: input.bucket.clone(),
                            object_key: object.key.clone(),
                            object_size: None,
                            object_etag: None,
                        });
                    }
                    if !input.delete.quiet {
                        output.deleted.push(DeletedObject { key: object.key });
                    }
                }
                Err(StoreError::Io(e)) => {
                    warn!(bucket = %input.bucket, key = %object.key, error = %e, "bulk delete entry failed");
                    output.errors.push(DeleteError {
                        key: object.key,
                        code: S3ErrorCode::InternalError.as_str().to_owned(),
                        message: "We encountered an internal error. Please try again.".to_owned(),
                    });
                }
                Err(other) => return Err(other.into()),
            }
        }
        Ok(output)
    }
}

/// Project a sidecar onto the response-header record.
fn object_headers(sidecar: &Sidecar, content_length: u64) -> ObjectHeaders {
    ObjectHeaders {
        etag: sidecar.quoted_etag(),
        last_modified: Some(sidecar.last_modified),
        content_type: sidecar.content_type.clone(),
        content_length,
        content_encoding: sidecar.content_encoding.clone(),
        content_disposition: sidecar.content_disposition.clone(),
        cache_control: sidecar.cache_control.clone(),
        expires: sidecar.expires.clone(),
        metadata: sidecar.metadata.clone(),
    }
}
