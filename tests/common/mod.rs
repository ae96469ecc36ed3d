#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, body::Body, http::Request};
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tubely_backend::config::AppConfig;
use tubely_backend::models::Video;
use tubely_backend::services::media::{MediaError, MediaTool, ProbeReport, ProbeStream};
use tubely_backend::services::storage::StorageService;
use tubely_backend::services::upload_service::VideoUploadService;
use tubely_backend::services::videos::VideoRepository;
use tubely_backend::utils::auth::create_jwt;
use tubely_backend::{AppState, create_app};
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";
pub const BOUNDARY: &str = "---------------------------tubelyboundary0123456789";

pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

#[derive(Default)]
pub struct MockStorageService {
    pub objects: Mutex<HashMap<String, StoredObject>>,
    pub fail: bool,
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn put_object(&self, key: &str, path: &Path, content_type: &str) -> anyhow::Result<()> {
        if self.fail {
            return Err(anyhow::anyhow!("bucket unavailable"));
        }
        let data = tokio::fs::read(path).await?;
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}

#[derive(Default)]
pub struct MockVideoRepository {
    pub videos: Mutex<HashMap<Uuid, Video>>,
    pub fail_updates: bool,
}

impl MockVideoRepository {
    pub fn insert(&self, video: Video) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    pub fn get(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl VideoRepository for MockVideoRepository {
    async fn get_video(&self, id: Uuid) -> anyhow::Result<Option<Video>> {
        Ok(self.get(id))
    }

    async fn update_video(&self, video: &Video) -> anyhow::Result<()> {
        if self.fail_updates {
            return Err(anyhow::anyhow!("database is locked"));
        }
        self.insert(video.clone());
        Ok(())
    }
}

/// Reports a fixed stream list and writes `output` as the remuxed file.
pub struct ScriptedMediaTool {
    pub streams: Vec<ProbeStream>,
    pub output: &'static [u8],
    pub inspected: Mutex<Vec<PathBuf>>,
    pub remux_calls: AtomicUsize,
}

impl ScriptedMediaTool {
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self::with_streams(vec![ProbeStream {
            codec_type: Some("video".to_string()),
            width,
            height,
        }])
    }

    pub fn with_streams(streams: Vec<ProbeStream>) -> Self {
        Self {
            streams,
            output: b"fast-start mp4",
            inspected: Mutex::new(Vec::new()),
            remux_calls: AtomicUsize::new(0),
        }
    }

    pub fn remux_calls(&self) -> usize {
        self.remux_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaTool for ScriptedMediaTool {
    async fn inspect(&self, path: &Path) -> Result<ProbeReport, MediaError> {
        assert!(path.exists(), "probe ran against a missing staged file");
        self.inspected.lock().unwrap().push(path.to_path_buf());
        Ok(ProbeReport {
            streams: self.streams.clone(),
        })
    }

    async fn remux(&self, input: &Path, output: &Path) -> Result<(), MediaError> {
        assert!(input.exists(), "remux ran against a missing staged file");
        self.remux_calls.fetch_add(1, Ordering::SeqCst);
        tokio::fs::write(output, self.output).await?;
        Ok(())
    }
}

pub struct TestApp {
    pub app: Router,
    pub videos: Arc<MockVideoRepository>,
    pub storage: Arc<MockStorageService>,
    pub media: Arc<ScriptedMediaTool>,
    pub staging: TempDir,
    pub owner: Uuid,
    pub video_id: Uuid,
}

impl TestApp {
    pub fn staged_entries(&self) -> usize {
        std::fs::read_dir(self.staging.path()).unwrap().count()
    }

    pub fn owner_token(&self) -> String {
        token_for(self.owner)
    }
}

pub fn sample_video(owner: Uuid) -> Video {
    let now = Utc::now();
    Video {
        id: Uuid::new_v4(),
        created_at: now,
        updated_at: now,
        title: "Boots".to_string(),
        description: "Unboxing".to_string(),
        thumbnail_url: None,
        video_url: None,
        user_id: owner,
    }
}

pub fn token_for(user_id: Uuid) -> String {
    create_jwt(user_id, JWT_SECRET, Duration::hours(1)).unwrap()
}

pub fn test_config(staging: &Path) -> AppConfig {
    AppConfig {
        jwt_secret: JWT_SECRET.to_string(),
        s3_bucket: "tubely-test".to_string(),
        s3_region: "us-east-2".to_string(),
        staging_dir: staging.to_path_buf(),
        ..AppConfig::default()
    }
}

pub fn build_app(
    media: ScriptedMediaTool,
    storage: MockStorageService,
    videos: MockVideoRepository,
) -> TestApp {
    build_app_with(media, storage, videos, |config| config)
}

pub fn build_app_with(
    media: ScriptedMediaTool,
    storage: MockStorageService,
    videos: MockVideoRepository,
    configure: impl FnOnce(AppConfig) -> AppConfig,
) -> TestApp {
    let staging = tempfile::tempdir().unwrap();
    let config = configure(test_config(staging.path()));

    let owner = Uuid::new_v4();
    let video = sample_video(owner);
    let video_id = video.id;
    videos.insert(video);

    let videos = Arc::new(videos);
    let storage = Arc::new(storage);
    let media = Arc::new(media);

    let upload_service = Arc::new(VideoUploadService::new(
        videos.clone(),
        storage.clone(),
        media.clone(),
        config.clone(),
    ));

    let app = create_app(AppState {
        videos: videos.clone(),
        upload_service,
        config,
    });

    TestApp {
        app,
        videos,
        storage,
        media,
        staging,
        owner,
        video_id,
    }
}

pub fn multipart_body(field: &str, content_type: Option<&str>, data: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"clip.mp4\"\r\n"
    )
    .into_bytes();
    if let Some(content_type) = content_type {
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn upload_request(video_id: &str, token: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(format!("/api/video_upload/{video_id}"))
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).unwrap()
}
