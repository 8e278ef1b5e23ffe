//! Multipart upload operations.

use s3dock_model::S3Error;
use s3dock_model::input::{
    AbortMultipartUploadInput, CompleteMultipartUploadInput, CreateMultipartUploadInput,
    UploadPartInput,
};
use s3dock_model::output::{
    CompleteMultipartUploadOutput, CreateMultipartUploadOutput, UploadPartOutput,
};

use crate::events::{EventName, EventRecord};
use crate::provider::S3Dock;
use crate::store::UploadManifest;

impl S3Dock {
    /// Initiate an upload: allocate an id and persist the creation-time
    /// headers for the final object.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, key validation failures.
    pub async fn handle_create_multipart_upload(
        &self,
        input: CreateMultipartUploadInput,
    ) -> Result<CreateMultipartUploadOutput, S3Error> {
        let upload_id = self
            .store
            .create_upload(UploadManifest {
                bucket: input.bucket.clone(),
                key: input.key.clone(),
                content_type: input.content_type,
                content_encoding: input.content_encoding,
                content_disposition: input.content_disposition,
                cache_control: input.cache_control,
                expires: input.expires,
                metadata: input.metadata,
            })
            .await?;

        Ok(CreateMultipartUploadOutput {
            bucket: input.bucket,
            key: input.key,
            upload_id,
        })
    }

    /// Stage one part.
    ///
    /// # Errors
    ///
    /// `NoSuchUpload`, `InvalidDigest`.
    pub async fn handle_upload_part(
        &self,
        input: UploadPartInput,
    ) -> Result<UploadPartOutput, S3Error> {
        let etag = self
            .store
            .put_part(
                &input.upload_id,
                input.part_number,
                input.body,
                input.content_md5.as_deref(),
            )
            .await?;
        Ok(UploadPartOutput {
            etag: format!("\"{etag}\""),
        })
    }

    /// Assemble the staged parts into the destination object and publish
    /// `ObjectCreated:Put`. The assembled etag is the plain MD5 of the
    /// concatenated bytes.
    ///
    /// # Errors
    ///
    /// `NoSuchUpload` (including an upload aimed at a different
    /// bucket/key), `InvalidPartOrder`, `InvalidPart`.
    pub async fn handle_complete_multipart_upload(
        &self,
        input: CompleteMultipartUploadInput,
    ) -> Result<CompleteMultipartUploadOutput, S3Error> {
        // The upload id is scoped to the bucket/key it was created for.
        let manifest = self.store.upload_manifest(&input.upload_id).await?;
        if manifest.bucket != input.bucket || manifest.key != input.key {
            return Err(S3Error::no_such_upload(input.upload_id));
        }

        let (_, sidecar, size) = self
            .store
            .complete_upload(&input.upload_id, &input.multipart_upload.parts)
            .await?;

        self.events.publish(&EventRecord {
            event_name: EventName::ObjectCreatedPut,
            bucket_name: input.bucket.clone(),
            object_key: input.key.clone(),
            object_size: Some(size),
            object_etag: Some(sidecar.etag.clone()),
        });

        Ok(CompleteMultipartUploadOutput {
            location: format!("/{}/{}", input.bucket, input.key),
            bucket: input.bucket,
            key: input.key,
            etag: sidecar.quoted_etag(),
        })
    }

    /// Drop an upload's staged state.
    ///
    /// # Errors
    ///
    /// `NoSuchUpload`.
    pub async fn handle_abort_multipart_upload(
        &self,
        input: AbortMultipartUploadInput,
    ) -> Result<(), S3Error> {
        self.store.abort_upload(&input.upload_id).await?;
        Ok(())
    }
}
