use std::env;
use std::path::PathBuf;

/// Runtime configuration for the upload service
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind address (default: "127.0.0.1")
    pub host: String,

    /// Bind port (default: 8091)
    pub port: u16,

    /// Database connection string (default: local SQLite file)
    pub database_url: String,

    /// JWT Secret Key (Required in production)
    pub jwt_secret: String,

    /// Maximum request body and staged file size in bytes (default: 1 GiB)
    pub max_upload_size: usize,

    /// Destination bucket for processed videos
    pub s3_bucket: String,

    /// Bucket region (default: "us-east-1")
    pub s3_region: String,

    /// S3-compatible endpoint override (MinIO, LocalStack)
    pub s3_endpoint: Option<String>,

    /// Static access key, used together with `s3_secret_key`
    pub s3_access_key: Option<String>,

    /// Static secret key
    pub s3_secret_key: Option<String>,

    /// CDN distribution base. When set, stored references point here
    /// instead of the bucket's public URL.
    pub cdn_base_url: Option<String>,

    /// ffmpeg binary name or path (default: "ffmpeg")
    pub ffmpeg_path: PathBuf,

    /// ffprobe binary name or path (default: "ffprobe")
    pub ffprobe_path: PathBuf,

    /// Directory for staged uploads (default: OS temp dir)
    pub staging_dir: PathBuf,

    /// Allowed CORS Origins (comma separated)
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8091,
            database_url: "sqlite://tubely.db?mode=rwc".to_string(),
            jwt_secret: "secret".to_string(),
            max_upload_size: 1 << 30, // 1 GiB
            s3_bucket: "tubely".to_string(),
            s3_region: "us-east-1".to_string(),
            s3_endpoint: None,
            s3_access_key: None,
            s3_secret_key: None,
            cdn_base_url: None,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            staging_dir: env::temp_dir(),
            allowed_origins: vec![
                "http://localhost:8091".to_string(),
                "http://127.0.0.1:8091".to_string(),
            ],
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(default.host),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),

            database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),

            jwt_secret: env::var("JWT_SECRET").unwrap_or(default.jwt_secret),

            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_size),

            s3_bucket: env::var("S3_BUCKET").unwrap_or(default.s3_bucket),
            s3_region: env::var("S3_REGION").unwrap_or(default.s3_region),
            s3_endpoint: non_empty_var("S3_ENDPOINT"),
            s3_access_key: non_empty_var("S3_ACCESS_KEY"),
            s3_secret_key: non_empty_var("S3_SECRET_KEY"),
            cdn_base_url: non_empty_var("S3_CF_DISTRO"),

            ffmpeg_path: env::var("FFMPEG_PATH")
                .map(PathBuf::from)
                .unwrap_or(default.ffmpeg_path),
            ffprobe_path: env::var("FFPROBE_PATH")
                .map(PathBuf::from)
                .unwrap_or(default.ffprobe_path),

            staging_dir: env::var("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.staging_dir),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(default.allowed_origins),
        }
    }

    /// Create config for development (local MinIO, relaxed secret)
    pub fn development() -> Self {
        Self {
            s3_endpoint: Some("http://127.0.0.1:9000".to_string()),
            s3_access_key: Some("minioadmin".to_string()),
            s3_secret_key: Some("minioadmin".to_string()),
            ..Self::default()
        }
    }

    /// Reference stored on the video record for an uploaded object.
    pub fn object_reference(&self, key: &str) -> String {
        match &self.cdn_base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.s3_bucket, self.s3_region, key
            ),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
