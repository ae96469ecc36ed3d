//! Local staging of uploaded bytes.
//!
//! A [`StagedFile`] owns its backing file for as long as it lives: dropping it
//! removes the file from disk, whichever way the owning request ends.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

const STAGING_PREFIX: &str = "tubely-upload";
const COPY_BUFFER_SIZE: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("staging I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("upload exceeds the {limit} byte limit")]
    LimitExceeded { limit: u64 },
}

#[derive(Debug)]
pub struct StagedFile {
    // Field order matters: the handle is closed before the path is removed.
    file: File,
    path: TempPath,
    size: u64,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Read handle positioned at the start of the content.
    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }
}

#[derive(Debug, Clone)]
pub struct StagingStore {
    dir: PathBuf,
}

impl StagingStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `source` into a uniquely named local file, writing at most `limit` bytes.
    pub async fn stage<R>(&self, mut source: R, limit: u64) -> Result<StagedFile, StagingError>
    where
        R: AsyncRead + Unpin,
    {
        let temp = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(".mp4")
            .tempfile_in(&self.dir)?;
        let (std_file, path) = temp.into_parts();
        let mut file = File::from_std(std_file);

        let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
        let mut written: u64 = 0;

        loop {
            let n = source.read(&mut buffer).await?;
            if n == 0 {
                break;
            }
            if written + n as u64 > limit {
                // `path` is dropped on return, removing the partial file.
                return Err(StagingError::LimitExceeded { limit });
            }
            file.write_all(&buffer[..n]).await?;
            written += n as u64;
        }

        file.flush().await?;
        file.seek(SeekFrom::Start(0)).await?;

        tracing::debug!("Staged {} bytes at {:?}", written, path);

        Ok(StagedFile {
            file,
            path,
            size: written,
        })
    }
}
