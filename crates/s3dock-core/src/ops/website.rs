//! Website-mode GET handling.

use bytes::Bytes;
use s3dock_model::S3Error;
use s3dock_model::output::WebsiteObjectOutput;
use tracing::debug;

use crate::provider::S3Dock;
use crate::website::{default_error_page, index_key};

impl S3Dock {
    /// Serve a GET against a website-configured bucket.
    ///
    /// Resolution order:
    /// 1. the key itself (when it names a document rather than a
    ///    directory),
    /// 2. the index document under the key,
    /// 3. the configured error document (404), or the built-in HTML 404.
    ///
    /// # Errors
    ///
    /// `NoSuchKey` when the bucket has no website configuration (the
    /// caller is expected to have checked); `InternalError` on filesystem
    /// failures.
    pub async fn handle_website_get(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<WebsiteObjectOutput, S3Error> {
        let Some(config) = self.website.effective(bucket) else {
            return Err(S3Error::no_such_key(key));
        };

        if !key.is_empty() && !key.ends_with('/') {
            if let Some(found) = self.try_read(bucket, key).await? {
                return Ok(found);
            }
        }

        let index = index_key(key, &config.index_document);
        if let Some(found) = self.try_read(bucket, &index).await? {
            debug!(bucket, key, index = %index, "served website index document");
            return Ok(found);
        }

        if let Some(error_document) = &config.error_document {
            if let Some(mut page) = self.try_read(bucket, error_document).await? {
                page.status = http::StatusCode::NOT_FOUND;
                debug!(bucket, key, error_document = %error_document, "served website error document");
                return Ok(page);
            }
        }

        Ok(WebsiteObjectOutput {
            status: http::StatusCode::NOT_FOUND,
            content_type: "text/html".to_owned(),
            body: Bytes::from(default_error_page(bucket, key)),
        })
    }

    /// Read a key as a 200 website document; absence is `None`.
    async fn try_read(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<Option<WebsiteObjectOutput>, S3Error> {
        use crate::error::StoreError;

        match self.store.get_object(bucket, key, None).await {
            Ok(read) => Ok(Some(WebsiteObjectOutput {
                status: http::StatusCode::OK,
                content_type: read.sidecar.content_type.clone(),
                body: read.body,
            })),
            Err(StoreError::NoSuchKey { .. } | StoreError::NoSuchBucket { .. }) => Ok(None),
            Err(other) => Err(other.into()),
        }
    }
}
