use super::{MediaError, MediaTool, ProbeReport, probe::parse_probe_output};
use async_trait::async_trait;
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;

/// [`MediaTool`] backed by the `ffprobe` and `ffmpeg` executables.
#[derive(Debug, Clone)]
pub struct FfmpegTool {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl Default for FfmpegTool {
    fn default() -> Self {
        Self::new("ffmpeg", "ffprobe")
    }
}

impl FfmpegTool {
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    pub fn ffmpeg_available(&self) -> bool {
        resolve_executable(&self.ffmpeg).is_some()
    }

    pub fn ffprobe_available(&self) -> bool {
        resolve_executable(&self.ffprobe).is_some()
    }

    async fn run(program: &Path, command: &mut Command) -> Result<Output, MediaError> {
        let tool = program.display().to_string();
        let output = command
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => MediaError::ToolNotFound { tool: tool.clone() },
                _ => MediaError::Spawn {
                    tool: tool.clone(),
                    source,
                },
            })?;

        if !output.status.success() {
            return Err(MediaError::Failed {
                tool,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output)
    }
}

#[async_trait]
impl MediaTool for FfmpegTool {
    async fn inspect(&self, path: &Path) -> Result<ProbeReport, MediaError> {
        let mut command = Command::new(&self.ffprobe);
        command
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path);

        let output = Self::run(&self.ffprobe, &mut command).await?;
        parse_probe_output(&output.stdout)
    }

    async fn remux(&self, input: &Path, output: &Path) -> Result<(), MediaError> {
        let Some(ffmpeg) = resolve_executable(&self.ffmpeg) else {
            return Err(MediaError::ToolNotFound {
                tool: self.ffmpeg.display().to_string(),
            });
        };

        let mut command = Command::new(&ffmpeg);
        command
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(output);

        Self::run(&ffmpeg, &mut command).await?;
        Ok(())
    }
}

/// Resolve a program name on `PATH`. Names containing a path separator are
/// checked as given.
pub fn resolve_executable(program: &Path) -> Option<PathBuf> {
    if program.components().count() > 1 {
        return is_executable(program).then(|| program.to_path_buf());
    }

    let search_path = env::var_os("PATH")?;
    env::split_paths(&search_path)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}
