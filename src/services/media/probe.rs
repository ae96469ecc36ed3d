use super::{MediaError, MediaTool, ProbeReport};
use crate::models::Classification;
use std::path::Path;

pub fn parse_probe_output(stdout: &[u8]) -> Result<ProbeReport, MediaError> {
    Ok(serde_json::from_slice(stdout)?)
}

/// Classify a local file by the geometry of its first listed stream.
pub async fn probe(tool: &dyn MediaTool, path: &Path) -> Result<Classification, MediaError> {
    let report = tool.inspect(path).await?;
    let stream = report.streams.first().ok_or(MediaError::NoStreams)?;

    let classification = Classification::from_dimensions(stream.width, stream.height);
    tracing::debug!(
        "Probed {:?}: {}x{} -> {}",
        path,
        stream.width,
        stream.height,
        classification
    );
    Ok(classification)
}
