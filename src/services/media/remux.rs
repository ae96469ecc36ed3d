use super::{MediaError, MediaTool};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

const PROCESSING_SUFFIX: &str = ".processing";

/// Remuxed copy of a staged upload. The file is removed when this is dropped.
#[derive(Debug)]
pub struct RemuxedFile {
    path: TempPath,
}

impl RemuxedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn processing_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(PROCESSING_SUFFIX);
    PathBuf::from(name)
}

/// Rewrite `input` for progressive playback into `{input}.processing`.
///
/// The output path is owned from before the tool runs, so partial output from
/// a failed run is removed too. A zero-byte result is rejected even when the
/// tool reports success.
pub async fn remux_for_fast_start(
    tool: &dyn MediaTool,
    input: &Path,
) -> Result<RemuxedFile, MediaError> {
    let output = TempPath::from_path(processing_path(input));

    tool.remux(input, &output).await?;

    let metadata = tokio::fs::metadata(&output).await?;
    if metadata.len() == 0 {
        return Err(MediaError::EmptyOutput {
            path: output.to_path_buf(),
        });
    }

    tracing::debug!("Remuxed {:?} ({} bytes)", output, metadata.len());
    Ok(RemuxedFile { path: output })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::media::ProbeReport;
    use async_trait::async_trait;

    /// Writes `content` to the output path, then returns `result`.
    struct WritingTool {
        content: Option<&'static [u8]>,
        fail: bool,
    }

    #[async_trait]
    impl MediaTool for WritingTool {
        async fn inspect(&self, _path: &Path) -> Result<ProbeReport, MediaError> {
            unreachable!("remux never inspects")
        }

        async fn remux(&self, _input: &Path, output: &Path) -> Result<(), MediaError> {
            if let Some(content) = self.content {
                tokio::fs::write(output, content).await?;
            }
            if self.fail {
                return Err(MediaError::Failed {
                    tool: "ffmpeg".to_string(),
                    status: "exit status: 1".to_string(),
                    stderr: "moov atom not found".to_string(),
                });
            }
            Ok(())
        }
    }

    fn staged_input(dir: &Path) -> PathBuf {
        let input = dir.join("upload.mp4");
        std::fs::write(&input, b"input").unwrap();
        input
    }

    #[test]
    fn test_processing_path() {
        assert_eq!(
            processing_path(Path::new("/tmp/tubely-upload123.mp4")),
            PathBuf::from("/tmp/tubely-upload123.mp4.processing")
        );
    }

    #[tokio::test]
    async fn test_remux_success() {
        let dir = tempfile::tempdir().unwrap();
        let input = staged_input(dir.path());
        let tool = WritingTool {
            content: Some(b"faststart"),
            fail: false,
        };

        let remuxed = remux_for_fast_start(&tool, &input).await.unwrap();
        assert_eq!(remuxed.path(), processing_path(&input));
        assert_eq!(std::fs::read(remuxed.path()).unwrap(), b"faststart");

        let path = remuxed.path().to_path_buf();
        drop(remuxed);
        assert!(!path.exists());
        assert!(input.exists());
    }

    #[tokio::test]
    async fn test_rejects_empty_output_despite_success() {
        let dir = tempfile::tempdir().unwrap();
        let input = staged_input(dir.path());
        let tool = WritingTool {
            content: Some(b""),
            fail: false,
        };

        let err = remux_for_fast_start(&tool, &input).await.unwrap_err();
        assert!(matches!(err, MediaError::EmptyOutput { .. }));
        assert!(!processing_path(&input).exists());
    }

    #[tokio::test]
    async fn test_missing_output_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = staged_input(dir.path());
        let tool = WritingTool {
            content: None,
            fail: false,
        };

        let err = remux_for_fast_start(&tool, &input).await.unwrap_err();
        assert!(matches!(err, MediaError::Io(_)));
    }

    #[tokio::test]
    async fn test_failed_tool_leaves_no_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = staged_input(dir.path());
        let tool = WritingTool {
            content: Some(b"partial"),
            fail: true,
        };

        let err = remux_for_fast_start(&tool, &input).await.unwrap_err();
        assert!(err.to_string().contains("moov atom not found"));
        assert!(!processing_path(&input).exists());
    }
}
