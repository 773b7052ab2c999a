//! Media references on seeker profiles and jobs.
//!
//! Clients upload blobs straight to the object store; this service runs
//! afterwards, checks the blob is there, and appends its `s3://` reference to
//! the owning record with a versioned update.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use jobli_core::employer::EmployerJob;
use jobli_core::seeker::JobSeeker;
use jobli_core::storage::{RepositoryError, Result, TableBackend};

use crate::repositories::{EmployerJobRepository, JobSeekerRepository};

/// Kind of media accepted on records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
    Image,
}

const MEDIA_EXTENSIONS: &[(&str, MediaKind)] = &[
    ("aac", MediaKind::Audio),
    ("flac", MediaKind::Audio),
    ("m4a", MediaKind::Audio),
    ("mp3", MediaKind::Audio),
    ("oga", MediaKind::Audio),
    ("ogg", MediaKind::Audio),
    ("wav", MediaKind::Audio),
    ("weba", MediaKind::Audio),
    ("avi", MediaKind::Video),
    ("m4v", MediaKind::Video),
    ("mkv", MediaKind::Video),
    ("mov", MediaKind::Video),
    ("mp4", MediaKind::Video),
    ("mpeg", MediaKind::Video),
    ("ogv", MediaKind::Video),
    ("webm", MediaKind::Video),
    ("bmp", MediaKind::Image),
    ("gif", MediaKind::Image),
    ("heic", MediaKind::Image),
    ("jpeg", MediaKind::Image),
    ("jpg", MediaKind::Image),
    ("png", MediaKind::Image),
    ("svg", MediaKind::Image),
    ("tif", MediaKind::Image),
    ("tiff", MediaKind::Image),
    ("webp", MediaKind::Image),
];

impl MediaKind {
    /// Classifies a file name by extension, case-insensitively.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, extension) = file_name.rsplit_once('.')?;
        let extension = extension.to_ascii_lowercase();
        MEDIA_EXTENSIONS
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, kind)| *kind)
    }
}

/// Checks that `file_name` is a single path segment naming a media file.
pub fn validate_media_file_name(file_name: &str) -> Result<MediaKind> {
    if file_name.trim().is_empty() {
        return Err(RepositoryError::bad_request("file_name cannot be empty"));
    }
    if file_name.contains('/') || file_name.contains('\\') {
        return Err(RepositoryError::bad_request(format!(
            "file_name must not contain path separators: {file_name}"
        )));
    }
    MediaKind::from_file_name(file_name).ok_or_else(|| {
        RepositoryError::bad_request(format!("{file_name} is not an audio, video or image file"))
    })
}

/// Blob store the media is uploaded to.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn bucket(&self) -> &str;

    async fn exists(&self, key: &str) -> Result<bool>;
}

/// Process-local object store.
pub struct InMemoryObjectStore {
    bucket: String,
    keys: RwLock<HashSet<String>>,
}

impl InMemoryObjectStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            keys: RwLock::new(HashSet::new()),
        }
    }

    /// Records an uploaded object.
    pub async fn put(&self, key: impl Into<String>) {
        self.keys.write().await.insert(key.into());
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.keys.read().await.contains(key))
    }
}

/// Object key of a job's media file.
pub fn job_media_key(employer_id: Uuid, job_id: Uuid, file_name: &str) -> String {
    format!("{employer_id}/{job_id}/{file_name}")
}

/// Object key of a seeker's media file.
pub fn seeker_media_key(seeker_id: &str, file_name: &str) -> String {
    format!("{seeker_id}/{file_name}")
}

pub struct MediaService<B, O: ?Sized> {
    seekers: Arc<JobSeekerRepository<B>>,
    jobs: Arc<EmployerJobRepository<B>>,
    objects: Arc<O>,
}

impl<B: TableBackend, O: ObjectStore + ?Sized> MediaService<B, O> {
    pub fn new(
        seekers: Arc<JobSeekerRepository<B>>,
        jobs: Arc<EmployerJobRepository<B>>,
        objects: Arc<O>,
    ) -> Self {
        Self {
            seekers,
            jobs,
            objects,
        }
    }

    /// Attaches an uploaded file to a job of `employer_id`.
    pub async fn finish_job_upload(
        &self,
        employer_id: Uuid,
        job_id: Uuid,
        file_name: &str,
        actor: &str,
    ) -> Result<EmployerJob> {
        validate_media_file_name(file_name)?;
        let mut job = self.jobs.get_for_employer(employer_id, job_id).await?;

        let key = job_media_key(employer_id, job_id, file_name);
        let reference = self.confirm_upload(&key).await?;
        tracing::info!(%employer_id, %job_id, %reference, "Attaching job media");

        job.media.push(reference);
        self.jobs.update(&job, actor).await
    }

    /// Attaches an uploaded file to a seeker profile.
    pub async fn finish_seeker_upload(
        &self,
        seeker_id: &str,
        file_name: &str,
        actor: &str,
    ) -> Result<JobSeeker> {
        validate_media_file_name(file_name)?;
        let mut seeker = self.seekers.get(seeker_id).await?;

        let key = seeker_media_key(seeker_id, file_name);
        let reference = self.confirm_upload(&key).await?;
        tracing::info!(seeker_id, %reference, "Attaching seeker media");

        seeker.media.push(reference);
        self.seekers.update(&seeker, actor).await
    }

    /// Returns the `s3://` reference of `key` once the object exists.
    async fn confirm_upload(&self, key: &str) -> Result<String> {
        let bucket = self.objects.bucket();
        if !self.objects.exists(key).await? {
            return Err(RepositoryError::bad_request(format!(
                "File was not uploaded yet [{key}] on bucket [{bucket}]"
            )));
        }
        Ok(format!("s3://{bucket}/{key}"))
    }
}
