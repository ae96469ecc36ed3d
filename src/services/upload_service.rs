use crate::config::AppConfig;
use crate::models::Video;
use crate::services::keys::derive_key;
use crate::services::media::{self, MediaError, MediaTool};
use crate::services::staging::{StagingError, StagingStore};
use crate::services::storage::StorageService;
use crate::services::videos::VideoRepository;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncRead;
use tracing::info;
use uuid::Uuid;

pub const ACCEPTED_MEDIA_TYPE: &str = "video/mp4";

/// One variant per pipeline step.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("couldn't load video {video_id}: {source}")]
    Lookup {
        video_id: Uuid,
        #[source]
        source: anyhow::Error,
    },

    #[error("video {0} not found")]
    VideoNotFound(Uuid),

    #[error("user {user_id} does not own video {video_id}")]
    NotOwner { user_id: Uuid, video_id: Uuid },

    #[error("incorrect file type {declared:?}, expected video/mp4")]
    UnsupportedMediaType { declared: Option<String> },

    #[error("couldn't stage upload: {0}")]
    Staging(#[from] StagingError),

    #[error("couldn't get the video's aspect ratio: {0}")]
    Probe(#[source] MediaError),

    #[error("couldn't process video for fast start: {0}")]
    Remux(#[source] MediaError),

    #[error("couldn't generate object key: {0}")]
    KeyDerivation(#[source] std::io::Error),

    #[error("couldn't put object {key} in bucket: {source}")]
    Store {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("couldn't update video URL: {0}")]
    RecordUpdate(#[source] anyhow::Error),
}

impl UploadError {
    /// Short description suitable for the caller.
    pub fn summary(&self) -> &'static str {
        match self {
            UploadError::Lookup { .. } => "Couldn't find video",
            UploadError::VideoNotFound(_) => "Video not found",
            UploadError::NotOwner { .. } => "Unauthorized",
            UploadError::UnsupportedMediaType { .. } => "Incorrect file type, expected video/mp4",
            UploadError::Staging(StagingError::LimitExceeded { .. }) => {
                "Upload exceeds the maximum allowed size"
            }
            UploadError::Staging(StagingError::Io(_)) => "Couldn't save file",
            UploadError::Probe(_) => "Couldn't get the video's aspect ratio",
            UploadError::Remux(_) => "Couldn't process video for fast start",
            UploadError::KeyDerivation(_) => "Couldn't generate filename",
            UploadError::Store { .. } => "Couldn't put object in bucket",
            UploadError::RecordUpdate(_) => "Couldn't update video URL",
        }
    }
}

/// Accept only the declared `video/mp4` type. Parameters such as `codecs` are ignored.
pub fn validate_media_type(declared: Option<&str>) -> Result<&'static str, UploadError> {
    let accepted = declared
        .and_then(|value| value.parse::<mime::Mime>().ok())
        .is_some_and(|m| m.essence_str().eq_ignore_ascii_case(ACCEPTED_MEDIA_TYPE));

    if accepted {
        Ok(ACCEPTED_MEDIA_TYPE)
    } else {
        Err(UploadError::UnsupportedMediaType {
            declared: declared.map(str::to_owned),
        })
    }
}

pub struct VideoUploadService {
    videos: Arc<dyn VideoRepository>,
    storage: Arc<dyn StorageService>,
    media: Arc<dyn MediaTool>,
    staging: StagingStore,
    config: AppConfig,
}

impl VideoUploadService {
    pub fn new(
        videos: Arc<dyn VideoRepository>,
        storage: Arc<dyn StorageService>,
        media: Arc<dyn MediaTool>,
        config: AppConfig,
    ) -> Self {
        Self {
            videos,
            storage,
            media,
            staging: StagingStore::new(config.staging_dir.clone()),
            config,
        }
    }

    /// Load the target record and check that `user_id` owns it.
    pub async fn authorize(&self, user_id: Uuid, video_id: Uuid) -> Result<Video, UploadError> {
        let video = self
            .videos
            .get_video(video_id)
            .await
            .map_err(|source| UploadError::Lookup { video_id, source })?
            .ok_or(UploadError::VideoNotFound(video_id))?;

        if video.user_id != user_id {
            return Err(UploadError::NotOwner { user_id, video_id });
        }

        Ok(video)
    }

    /// Stage, classify, remux and store the uploaded part, then link the
    /// stored object to `video`.
    ///
    /// Local files are released in reverse order of creation on every exit
    /// path. The record is only touched after the object store accepted the
    /// upload.
    pub async fn ingest<R>(
        &self,
        mut video: Video,
        declared_type: Option<&str>,
        source: R,
    ) -> Result<Video, UploadError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let media_type = validate_media_type(declared_type)?;

        let staged = self
            .staging
            .stage(source, self.config.max_upload_size as u64)
            .await?;
        info!(
            "📥 Staged {} bytes for video {} at {:?}",
            staged.size(),
            video.id,
            staged.path()
        );

        let classification = media::probe(self.media.as_ref(), staged.path())
            .await
            .map_err(UploadError::Probe)?;
        info!("📐 Video {} classified as {}", video.id, classification);

        let remuxed = media::remux_for_fast_start(self.media.as_ref(), staged.path())
            .await
            .map_err(UploadError::Remux)?;

        let key = derive_key(classification).map_err(UploadError::KeyDerivation)?;

        self.storage
            .put_object(key.as_str(), remuxed.path(), media_type)
            .await
            .map_err(|source| UploadError::Store {
                key: key.to_string(),
                source,
            })?;
        info!("☁️  Stored video {} as {}", video.id, key);

        // Stored object is not reconciled if this update fails.
        video.video_url = Some(self.config.object_reference(key.as_str()));
        video.updated_at = Utc::now();
        self.videos
            .update_video(&video)
            .await
            .map_err(UploadError::RecordUpdate)?;
        info!("✅ Video {} now references {:?}", video.id, video.video_url);

        Ok(video)
    }
}
