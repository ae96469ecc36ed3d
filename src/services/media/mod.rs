//! Media inspection and fast-start remuxing behind the [`MediaTool`] seam.

use async_trait::async_trait;
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod ffmpeg;
pub mod probe;
pub mod remux;

pub use ffmpeg::FfmpegTool;
pub use probe::probe;
pub use remux::{RemuxedFile, remux_for_fast_start};

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{tool} not found in PATH")]
    ToolNotFound { tool: String },

    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("failed to parse inspection output: {0}")]
    MalformedOutput(#[from] serde_json::Error),

    #[error("no streams found in video")]
    NoStreams,

    #[error("processed file {} is empty", .path.display())]
    EmptyOutput { path: PathBuf },

    #[error("could not stat processed file: {0}")]
    Io(#[from] io::Error),
}

/// Structured result of inspecting a media file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProbeReport {
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProbeStream {
    #[serde(default)]
    pub codec_type: Option<String>,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

#[async_trait]
pub trait MediaTool: Send + Sync {
    /// List the streams of a local media file.
    async fn inspect(&self, path: &Path) -> Result<ProbeReport, MediaError>;

    /// Stream-copy `input` into `output` with the container index moved to the front.
    async fn remux(&self, input: &Path, output: &Path) -> Result<(), MediaError>;
}
