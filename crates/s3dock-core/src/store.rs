//! The filesystem-backed object store.
//!
//! Layout under the data root:
//!
//! ```text
//! <root>/<bucket>/                          bucket directory
//! <root>/<bucket>/<key>                     content blob
//! <root>/<bucket>/<key>.s3dock_meta.json    metadata sidecar
//! <root>/.staging/                          in-flight write staging
//! <root>/.uploads/<upload_id>/              multipart part staging
//! ```
//!
//! Writes stage into `.staging` and move into place with rename, blob first
//! and sidecar second, so a concurrent reader sees either the old object or
//! the new one in full. A reader that catches the window between the two
//! renames retries once before declaring the object corrupt. Staged files
//! are removed on drop, so a cancelled upload leaves nothing behind.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use base64::Engine;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::{debug, trace};
use uuid::Uuid;
use walkdir::WalkDir;

use s3dock_model::types::{BucketEntry, CompletedPart, ObjectSummary};

use crate::error::StoreError;
use crate::sidecar::{SIDECAR_SUFFIX, Sidecar};
use crate::validation::{validate_bucket_name, validate_object_key};

/// Directory under the root holding in-flight write staging files.
const STAGING_DIR: &str = ".staging";

/// Directory under the root holding multipart upload state.
const UPLOADS_DIR: &str = ".uploads";

/// Filename of the per-upload manifest inside an upload directory.
const UPLOAD_MANIFEST: &str = "manifest.json";

/// Chunk size for feeding the MD5 context while writing.
const HASH_CHUNK: usize = 64 * 1024;

/// Everything remembered at multipart initiation, applied to the assembled
/// object on completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadManifest {
    /// Destination bucket.
    pub bucket: String,
    /// Destination key.
    pub key: String,
    /// Declared content type for the final object.
    pub content_type: Option<String>,
    /// Pass-through `Content-Encoding`.
    pub content_encoding: Option<String>,
    /// Pass-through `Content-Disposition`.
    pub content_disposition: Option<String>,
    /// Pass-through `Cache-Control`.
    pub cache_control: Option<String>,
    /// Pass-through `Expires`.
    pub expires: Option<String>,
    /// User metadata for the final object.
    pub metadata: HashMap<String, String>,
}

/// A fully-read object: sidecar, content (possibly a range slice), sizes.
#[derive(Debug)]
pub struct ObjectRead {
    /// The object's sidecar.
    pub sidecar: Sidecar,
    /// The requested bytes.
    pub body: Bytes,
    /// Total on-disk size of the blob.
    pub total_size: u64,
    /// The satisfied range, when one was requested.
    pub range: Option<(u64, u64)>,
}

/// Object attributes without content, for HeadObject.
#[derive(Debug)]
pub struct ObjectStat {
    /// The object's sidecar.
    pub sidecar: Sidecar,
    /// Total on-disk size of the blob.
    pub total_size: u64,
    /// The satisfied range, when one was requested.
    pub range: Option<(u64, u64)>,
}

/// The store. Cheap to clone-by-reference; the server wraps it in an `Arc`.
#[derive(Debug)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open (and create, if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error when the root or its staging directories cannot be
    /// created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        std::fs::create_dir_all(root.join(STAGING_DIR))?;
        std::fs::create_dir_all(root.join(UPLOADS_DIR))?;
        debug!(root = %root.display(), "opened object store");
        Ok(Self { root })
    }

    /// The data root this store owns.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    // -----------------------------------------------------------------------
    // Path mapping
    // -----------------------------------------------------------------------

    fn bucket_dir(&self, bucket: &str) -> PathBuf {
        self.root.join(bucket)
    }

    fn blob_path(&self, bucket: &str, key: &str) -> PathBuf {
        let mut path = self.bucket_dir(bucket);
        for segment in key.split('/') {
            if !segment.is_empty() {
                path.push(segment);
            }
        }
        path
    }

    fn sidecar_path(blob: &Path) -> PathBuf {
        let mut name = blob
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        name.push_str(SIDECAR_SUFFIX);
        blob.with_file_name(name)
    }

    fn staging_path(&self) -> PathBuf {
        self.root
            .join(STAGING_DIR)
            .join(Uuid::new_v4().to_string())
    }

    fn upload_dir(&self, upload_id: &str) -> PathBuf {
        self.root.join(UPLOADS_DIR).join(upload_id)
    }

    /// Reject hidden names so the staging directories never resolve as
    /// buckets, then require the bucket directory to exist.
    fn require_bucket(&self, bucket: &str) -> Result<PathBuf, StoreError> {
        let missing = || StoreError::NoSuchBucket {
            bucket: bucket.to_owned(),
        };
        if bucket.is_empty() || bucket.starts_with('.') || bucket.contains('/') {
            return Err(missing());
        }
        let dir = self.bucket_dir(bucket);
        if dir.is_dir() { Ok(dir) } else { Err(missing()) }
    }

    // -----------------------------------------------------------------------
    // Buckets
    // -----------------------------------------------------------------------

    /// Create a bucket directory. Creating an existing bucket succeeds.
    ///
    /// # Errors
    ///
    /// `InvalidBucketName` for grammar violations; `BucketAlreadyExists`
    /// when a non-directory entry occupies the name.
    pub async fn create_bucket(&self, bucket: &str) -> Result<(), StoreError> {
        validate_bucket_name(bucket)?;
        let dir = self.bucket_dir(bucket);
        match tokio::fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(StoreError::BucketAlreadyExists {
                bucket: bucket.to_owned(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tokio::fs::create_dir_all(&dir).await?;
                debug!(bucket, "created bucket");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Whether the bucket directory exists.
    #[must_use]
    pub fn bucket_exists(&self, bucket: &str) -> bool {
        !bucket.starts_with('.') && self.bucket_dir(bucket).is_dir()
    }

    /// Delete a bucket that holds no objects.
    ///
    /// Sidecar files and empty key-directories do not count as content, so
    /// they never block deletion.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` when absent, `BucketNotEmpty` when objects remain.
    pub async fn delete_bucket(&self, bucket: &str) -> Result<(), StoreError> {
        let dir = self.require_bucket(bucket)?;
        if self.bucket_holds_objects(&dir) {
            return Err(StoreError::BucketNotEmpty {
                bucket: bucket.to_owned(),
            });
        }
        tokio::fs::remove_dir_all(&dir).await?;
        debug!(bucket, "deleted bucket");
        Ok(())
    }

    fn bucket_holds_objects(&self, dir: &Path) -> bool {
        WalkDir::new(dir)
            .into_iter()
            .filter_map(Result::ok)
            .any(|entry| {
                entry.file_type().is_file()
                    && !entry.file_name().to_string_lossy().ends_with(SIDECAR_SUFFIX)
            })
    }

    /// Enumerate bucket directories with their creation times (directory
    /// mtime), sorted by name.
    ///
    /// # Errors
    ///
    /// Propagates filesystem errors reading the root.
    pub async fn list_buckets(&self) -> Result<Vec<BucketEntry>, StoreError> {
        let mut buckets = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let meta = entry.metadata().await?;
            if !meta.is_dir() {
                continue;
            }
            let creation_date = meta
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());
            buckets.push(BucketEntry {
                name,
                creation_date,
            });
        }
        buckets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(buckets)
    }

    // -----------------------------------------------------------------------
    // Objects
    // -----------------------------------------------------------------------

    /// Write an object: stream to staging while hashing, verify the digest,
    /// then rename the blob and its sidecar into place.
    ///
    /// `sidecar` arrives with header fields filled in; the etag and
    /// last-modified instant are stamped here. Returns the final sidecar
    /// and the byte count.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, key validation failures, `InvalidDigest` on a
    /// `Content-MD5` mismatch, and I/O failures.
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        expected_md5_b64: Option<&str>,
        mut sidecar: Sidecar,
    ) -> Result<(Sidecar, u64), StoreError> {
        self.require_bucket(bucket)?;
        validate_object_key(key)?;
        if key.ends_with('/') {
            return Err(StoreError::InvalidKey {
                key: key.to_owned(),
                reason: "upload keys must not end with '/'".to_owned(),
            });
        }

        let size = body.len() as u64;
        let (staged, etag) = self.stage_blob(&body).await?;
        verify_content_md5(expected_md5_b64, &etag)?;

        sidecar.etag = etag;
        sidecar.last_modified = Utc::now();

        let blob = self.blob_path(bucket, key);
        self.promote(staged, &blob, &sidecar).await?;

        trace!(bucket, key, size, etag = %sidecar.etag, "stored object");
        Ok((sidecar, size))
    }

    /// Read an object, optionally a single byte range of it.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`/`NoSuchKey` when absent, `InvalidRange` when a parsed
    /// range cannot be satisfied, `InternalError` (via `Corrupt`) when the
    /// sidecar is missing after a retry.
    pub async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        range_header: Option<&str>,
    ) -> Result<ObjectRead, StoreError> {
        self.require_bucket(bucket)?;
        validate_object_key(key)?;
        let blob = self.blob_path(bucket, key);
        let meta = blob_metadata(&blob, key).await?;
        let total_size = meta.len();
        let sidecar = self.read_sidecar(&blob, key).await?;

        let range = match range_header {
            Some(header) => parse_range(header, total_size)?,
            None => None,
        };

        let body = match range {
            Some((start, end)) => {
                let mut file = tokio::fs::File::open(&blob).await?;
                file.seek(std::io::SeekFrom::Start(start)).await?;
                let len = (end - start + 1) as usize;
                let mut buf = vec![0_u8; len];
                file.read_exact(&mut buf).await?;
                Bytes::from(buf)
            }
            None => Bytes::from(tokio::fs::read(&blob).await?),
        };

        Ok(ObjectRead {
            sidecar,
            body,
            total_size,
            range,
        })
    }

    /// Object attributes without the content, for HeadObject.
    ///
    /// # Errors
    ///
    /// As for [`get_object`](Self::get_object).
    pub async fn stat_object(
        &self,
        bucket: &str,
        key: &str,
        range_header: Option<&str>,
    ) -> Result<ObjectStat, StoreError> {
        self.require_bucket(bucket)?;
        validate_object_key(key)?;
        let blob = self.blob_path(bucket, key);
        let meta = blob_metadata(&blob, key).await?;
        let total_size = meta.len();
        let sidecar = self.read_sidecar(&blob, key).await?;
        let range = match range_header {
            Some(header) => parse_range(header, total_size)?,
            None => None,
        };
        Ok(ObjectStat {
            sidecar,
            total_size,
            range,
        })
    }

    /// Whether the object exists (blob present).
    #[must_use]
    pub fn object_exists(&self, bucket: &str, key: &str) -> bool {
        self.bucket_exists(bucket) && self.blob_path(bucket, key).is_file()
    }

    /// Remove an object. Absence is not an error; the return value reports
    /// whether anything was actually removed. Ancestor directories emptied
    /// by the removal are pruned up to (never including) the bucket root.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` when the bucket is absent, plus I/O failures other
    /// than not-found.
    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<bool, StoreError> {
        let bucket_dir = self.require_bucket(bucket)?;
        validate_object_key(key)?;
        let blob = self.blob_path(bucket, key);

        let existed = match tokio::fs::remove_file(&blob).await {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };
        let _ = tokio::fs::remove_file(Self::sidecar_path(&blob)).await;

        prune_empty_ancestors(blob.parent(), &bucket_dir).await;

        if existed {
            trace!(bucket, key, "deleted object");
        }
        Ok(existed)
    }

    /// All keys in a bucket starting with `prefix`, unsorted.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` when the bucket is absent.
    pub async fn collect_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StoreError> {
        let dir = self.require_bucket(bucket)?;
        let mut keys = Vec::new();
        for entry in WalkDir::new(&dir).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if name.ends_with(SIDECAR_SUFFIX) {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&dir) else {
                continue;
            };
            let key = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    /// Listing entries (etag, mtime, size) for the given keys, in order.
    ///
    /// # Errors
    ///
    /// Propagates read failures; a blob that lost its sidecar surfaces as
    /// `Corrupt`.
    pub async fn summarize(
        &self,
        bucket: &str,
        keys: &[String],
    ) -> Result<Vec<ObjectSummary>, StoreError> {
        let mut summaries = Vec::with_capacity(keys.len());
        for key in keys {
            let blob = self.blob_path(bucket, key);
            let meta = blob_metadata(&blob, key).await?;
            let sidecar = self.read_sidecar(&blob, key).await?;
            summaries.push(ObjectSummary {
                key: key.clone(),
                last_modified: sidecar.last_modified,
                etag: sidecar.quoted_etag(),
                size: meta.len(),
            });
        }
        Ok(summaries)
    }

    // -----------------------------------------------------------------------
    // Multipart uploads
    // -----------------------------------------------------------------------

    /// Begin a multipart upload: allocate an id and persist the manifest.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, key validation failures, and I/O failures.
    pub async fn create_upload(&self, manifest: UploadManifest) -> Result<String, StoreError> {
        self.require_bucket(&manifest.bucket)?;
        validate_object_key(&manifest.key)?;

        let upload_id = Uuid::new_v4().to_string();
        let dir = self.upload_dir(&upload_id);
        tokio::fs::create_dir_all(&dir).await?;
        let json = serde_json::to_vec(&manifest)
            .map_err(|e| StoreError::Io(std::io::Error::other(e)))?;
        tokio::fs::write(dir.join(UPLOAD_MANIFEST), json).await?;
        debug!(bucket = %manifest.bucket, key = %manifest.key, upload_id, "initiated multipart upload");
        Ok(upload_id)
    }

    /// The manifest recorded when an upload was initiated.
    ///
    /// # Errors
    ///
    /// `NoSuchUpload` for unknown ids.
    pub async fn upload_manifest(&self, upload_id: &str) -> Result<UploadManifest, StoreError> {
        self.read_manifest(upload_id).await
    }

    /// Upload ids are UUIDs we allocated; anything else (in particular a
    /// path-shaped value) is simply unknown.
    fn valid_upload_id(upload_id: &str) -> bool {
        !upload_id.is_empty()
            && upload_id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-')
    }

    async fn read_manifest(&self, upload_id: &str) -> Result<UploadManifest, StoreError> {
        if !Self::valid_upload_id(upload_id) {
            return Err(StoreError::NoSuchUpload {
                upload_id: upload_id.to_owned(),
            });
        }
        let path = self.upload_dir(upload_id).join(UPLOAD_MANIFEST);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|_| StoreError::NoSuchUpload {
                upload_id: upload_id.to_owned(),
            })?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
            key: upload_id.to_owned(),
            detail: format!("unreadable upload manifest: {e}"),
        })
    }

    /// Stage one part of a multipart upload. Returns the part's hex etag.
    ///
    /// # Errors
    ///
    /// `NoSuchUpload` for unknown ids, `InvalidDigest` on mismatch, and
    /// I/O failures.
    pub async fn put_part(
        &self,
        upload_id: &str,
        part_number: u32,
        body: Bytes,
        expected_md5_b64: Option<&str>,
    ) -> Result<String, StoreError> {
        // Existence check doubles as the NoSuchUpload probe.
        self.read_manifest(upload_id).await?;

        let (staged, etag) = self.stage_blob(&body).await?;
        verify_content_md5(expected_md5_b64, &etag)?;

        let target = self.upload_dir(upload_id).join(format!("part-{part_number}"));
        staged.persist(&target).await?;
        trace!(upload_id, part_number, "staged part");
        Ok(etag)
    }

    /// Assemble the named parts, in the order given, into the destination
    /// object, then drop the upload state.
    ///
    /// # Errors
    ///
    /// `NoSuchUpload`, `InvalidPartOrder` for a non-ascending part list,
    /// `InvalidPart` for parts never uploaded or with mismatched etags,
    /// plus put-path failures.
    pub async fn complete_upload(
        &self,
        upload_id: &str,
        parts: &[CompletedPart],
    ) -> Result<(UploadManifest, Sidecar, u64), StoreError> {
        let manifest = self.read_manifest(upload_id).await?;
        self.require_bucket(&manifest.bucket)?;

        if parts.is_empty() {
            return Err(StoreError::InvalidRequest {
                message: "part list must not be empty".to_owned(),
            });
        }
        if parts.windows(2).any(|w| w[0].part_number >= w[1].part_number) {
            return Err(StoreError::InvalidPartOrder);
        }

        let staging = self.staging_path();
        let staged = StagedFile::create(&staging).await?;
        let mut out = tokio::fs::File::create(&staging).await?;
        let mut hasher = Md5::new();
        let mut size: u64 = 0;

        for part in parts {
            let path = self.upload_dir(upload_id).join(format!("part-{}", part.part_number));
            let data = tokio::fs::read(&path)
                .await
                .map_err(|_| StoreError::InvalidPart {
                    part_number: part.part_number,
                })?;
            if let Some(expected) = part.etag.as_deref() {
                let actual = hex_md5(&data);
                if expected.trim_matches('"') != actual {
                    return Err(StoreError::InvalidPart {
                        part_number: part.part_number,
                    });
                }
            }
            hasher.update(&data);
            size += data.len() as u64;
            out.write_all(&data).await?;
        }
        out.flush().await?;
        drop(out);

        let mut sidecar = Sidecar::new(
            manifest.content_type.clone(),
            format!("{:x}", hasher.finalize()),
            manifest.metadata.clone(),
        );
        sidecar.content_encoding = manifest.content_encoding.clone();
        sidecar.content_disposition = manifest.content_disposition.clone();
        sidecar.cache_control = manifest.cache_control.clone();
        sidecar.expires = manifest.expires.clone();

        let blob = self.blob_path(&manifest.bucket, &manifest.key);
        self.promote(staged, &blob, &sidecar).await?;

        let _ = tokio::fs::remove_dir_all(self.upload_dir(upload_id)).await;
        debug!(
            bucket = %manifest.bucket,
            key = %manifest.key,
            upload_id,
            parts = parts.len(),
            size,
            "completed multipart upload"
        );
        Ok((manifest, sidecar, size))
    }

    /// Drop an upload's staged parts and manifest.
    ///
    /// # Errors
    ///
    /// `NoSuchUpload` for unknown ids.
    pub async fn abort_upload(&self, upload_id: &str) -> Result<(), StoreError> {
        if !Self::valid_upload_id(upload_id) {
            return Err(StoreError::NoSuchUpload {
                upload_id: upload_id.to_owned(),
            });
        }
        let dir = self.upload_dir(upload_id);
        if !dir.is_dir() {
            return Err(StoreError::NoSuchUpload {
                upload_id: upload_id.to_owned(),
            });
        }
        tokio::fs::remove_dir_all(&dir).await?;
        debug!(upload_id, "aborted multipart upload");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Shutdown support
    // -----------------------------------------------------------------------

    /// Recursively empty the data root, keeping the root directory itself.
    ///
    /// # Errors
    ///
    /// Propagates filesystem errors.
    pub async fn wipe(&self) -> Result<(), StoreError> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.metadata().await?.is_dir() {
                tokio::fs::remove_dir_all(&path).await?;
            } else {
                tokio::fs::remove_file(&path).await?;
            }
        }
        debug!(root = %self.root.display(), "wiped data root");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Write plumbing
    // -----------------------------------------------------------------------

    /// Write `body` to a staging file while computing its MD5.
    async fn stage_blob(&self, body: &Bytes) -> Result<(StagedFile, String), StoreError> {
        let path = self.staging_path();
        let staged = StagedFile::create(&path).await?;
        let mut file = tokio::fs::File::create(&path).await?;
        let mut hasher = Md5::new();
        for chunk in body.chunks(HASH_CHUNK) {
            hasher.update(chunk);
            file.write_all(chunk).await?;
        }
        file.flush().await?;
        Ok((staged, format!("{:x}", hasher.finalize())))
    }

    /// Move a staged blob and its sidecar into place: parents first, then
    /// the blob, then the sidecar.
    async fn promote(
        &self,
        staged: StagedFile,
        blob: &Path,
        sidecar: &Sidecar,
    ) -> Result<(), StoreError> {
        if let Some(parent) = blob.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotADirectory
                    || e.kind() == std::io::ErrorKind::AlreadyExists
                {
                    StoreError::InvalidRequest {
                        message: "key conflicts with an existing object".to_owned(),
                    }
                } else {
                    StoreError::Io(e)
                }
            })?;
        }
        if blob.is_dir() {
            return Err(StoreError::InvalidRequest {
                message: "key conflicts with an existing key hierarchy".to_owned(),
            });
        }

        staged.persist(blob).await?;

        let json = serde_json::to_vec(sidecar)
            .map_err(|e| StoreError::Io(std::io::Error::other(e)))?;
        let sidecar_staging = self.staging_path();
        let staged_sidecar = StagedFile::create(&sidecar_staging).await?;
        tokio::fs::write(&sidecar_staging, json).await?;
        staged_sidecar.persist(&Self::sidecar_path(blob)).await?;
        Ok(())
    }

    /// Read a sidecar, retrying once to ride out the blob/sidecar rename
    /// window of a concurrent writer.
    async fn read_sidecar(&self, blob: &Path, key: &str) -> Result<Sidecar, StoreError> {
        let path = Self::sidecar_path(blob);
        for attempt in 0..2 {
            match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    return serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
                        key: key.to_owned(),
                        detail: format!("unreadable sidecar: {e}"),
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound && attempt == 0 => {
                    tokio::task::yield_now().await;
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(StoreError::Corrupt {
                        key: key.to_owned(),
                        detail: "blob present but sidecar missing".to_owned(),
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }
        unreachable!("sidecar read loop always returns")
    }
}

/// Stat a blob path, mapping absence (or a directory) to `NoSuchKey`.
async fn blob_metadata(blob: &Path, key: &str) -> Result<std::fs::Metadata, StoreError> {
    match tokio::fs::metadata(blob).await {
        Ok(meta) if meta.is_file() => Ok(meta),
        Ok(_) | Err(_) => Err(StoreError::NoSuchKey {
            key: key.to_owned(),
        }),
    }
}

/// Remove directories left empty by a delete, ascending toward (but never
/// touching) the bucket root. Races with concurrent writers are benign:
/// `remove_dir` fails on non-empty directories and the walk stops.
async fn prune_empty_ancestors(start: Option<&Path>, bucket_dir: &Path) {
    let mut current = start.map(Path::to_path_buf);
    while let Some(dir) = current {
        if dir == bucket_dir || !dir.starts_with(bucket_dir) {
            break;
        }
        if tokio::fs::remove_dir(&dir).await.is_err() {
            break;
        }
        current = dir.parent().map(Path::to_path_buf);
    }
}

/// Verify a base64 `Content-MD5` header against the computed hex digest.
fn verify_content_md5(expected_b64: Option<&str>, actual_hex: &str) -> Result<(), StoreError> {
    let Some(expected) = expected_b64 else {
        return Ok(());
    };
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(expected.trim())
        .map_err(|_| StoreError::DigestMismatch)?;
    let expected_hex: String = decoded.iter().map(|b| format!("{b:02x}")).collect();
    if expected_hex == actual_hex {
        Ok(())
    } else {
        Err(StoreError::DigestMismatch)
    }
}

/// Hex MD5 of a byte slice.
#[must_use]
pub fn hex_md5(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Parse a `Range` header against the blob size.
///
/// Returns `Ok(None)` for absent/unsupported shapes (the caller serves the
/// full object with a 200) and `UnsatisfiableRange` for well-formed ranges
/// that cannot be satisfied (the caller answers 416).
///
/// # Errors
///
/// `UnsatisfiableRange` as described above.
pub fn parse_range(header: &str, total: u64) -> Result<Option<(u64, u64)>, StoreError> {
    let Some(spec) = header.strip_prefix("bytes=") else {
        return Ok(None);
    };
    // Multi-range requests are not supported; serve the full object.
    if spec.contains(',') {
        return Ok(None);
    }
    let unsatisfiable = || StoreError::UnsatisfiableRange {
        range: header.to_owned(),
    };

    let (start_raw, end_raw) = spec.split_once('-').ok_or_else(unsatisfiable)?;

    if start_raw.is_empty() {
        // Suffix form: the final N bytes.
        let suffix: u64 = end_raw.parse().map_err(|_| unsatisfiable())?;
        if suffix == 0 || total == 0 {
            return Err(unsatisfiable());
        }
        let start = total.saturating_sub(suffix);
        return Ok(Some((start, total - 1)));
    }

    let start: u64 = start_raw.parse().map_err(|_| unsatisfiable())?;
    if start >= total {
        return Err(unsatisfiable());
    }
    let end = if end_raw.is_empty() {
        total - 1
    } else {
        let end: u64 = end_raw.parse().map_err(|_| unsatisfiable())?;
        if end < start {
            return Err(unsatisfiable());
        }
        end.min(total - 1)
    };
    Ok(Some((start, end)))
}

/// A staging file removed on drop unless it was persisted by rename.
#[derive(Debug)]
struct StagedFile {
    path: PathBuf,
    persisted: bool,
}

impl StagedFile {
    async fn create(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(Self {
            path: path.to_path_buf(),
            persisted: false,
        })
    }

    async fn persist(mut self, target: &Path) -> Result<(), StoreError> {
        tokio::fs::rename(&self.path, target).await?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.persisted {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
