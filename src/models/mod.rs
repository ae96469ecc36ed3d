use crate::entities::videos;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Video {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub user_id: Uuid,
}

impl From<videos::Model> for Video {
    fn from(model: videos::Model) -> Self {
        Self {
            id: model.id,
            created_at: model.created_at,
            updated_at: model.updated_at,
            title: model.title,
            description: model.description,
            thumbnail_url: model.thumbnail_url,
            video_url: model.video_url,
            user_id: model.user_id,
        }
    }
}

const LANDSCAPE_RATIO: f64 = 16.0 / 9.0;
const PORTRAIT_RATIO: f64 = 9.0 / 16.0;
const RATIO_TOLERANCE: f64 = 0.1;

/// Aspect-ratio class of a video. Used as the object key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Landscape,
    Portrait,
    Other,
}

impl Classification {
    /// Both bounds are exclusive. Degenerate geometry (zero height) is `Other`.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        let ratio = f64::from(width) / f64::from(height);

        if ratio > LANDSCAPE_RATIO - RATIO_TOLERANCE && ratio < LANDSCAPE_RATIO + RATIO_TOLERANCE
        {
            Classification::Landscape
        } else if ratio > PORTRAIT_RATIO - RATIO_TOLERANCE
            && ratio < PORTRAIT_RATIO + RATIO_TOLERANCE
        {
            Classification::Portrait
        } else {
            Classification::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Landscape => "landscape",
            Classification::Portrait => "portrait",
            Classification::Other => "other",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_resolutions() {
        assert_eq!(Classification::from_dimensions(1280, 720), Classification::Landscape);
        assert_eq!(Classification::from_dimensions(1920, 1080), Classification::Landscape);
        assert_eq!(Classification::from_dimensions(720, 1280), Classification::Portrait);
        assert_eq!(Classification::from_dimensions(1080, 1920), Classification::Portrait);
        assert_eq!(Classification::from_dimensions(1000, 1000), Classification::Other);
        assert_eq!(Classification::from_dimensions(640, 480), Classification::Other);
    }

    #[test]
    fn test_tolerance_edges() {
        // 16/9 + 0.1 = 1.8777..
        assert_eq!(Classification::from_dimensions(1877, 1000), Classification::Landscape);
        assert_eq!(Classification::from_dimensions(1878, 1000), Classification::Other);
        // 16/9 - 0.1 = 1.6777..
        assert_eq!(Classification::from_dimensions(1678, 1000), Classification::Landscape);
        assert_eq!(Classification::from_dimensions(1677, 1000), Classification::Other);
        // 9/16 +- 0.1 = 0.6625 / 0.4625
        assert_eq!(Classification::from_dimensions(662, 1000), Classification::Portrait);
        assert_eq!(Classification::from_dimensions(663, 1000), Classification::Other);
        assert_eq!(Classification::from_dimensions(463, 1000), Classification::Portrait);
        assert_eq!(Classification::from_dimensions(462, 1000), Classification::Other);
    }

    #[test]
    fn test_degenerate_geometry() {
        assert_eq!(Classification::from_dimensions(0, 0), Classification::Other);
        assert_eq!(Classification::from_dimensions(1920, 0), Classification::Other);
        assert_eq!(Classification::from_dimensions(0, 1080), Classification::Other);
    }

    #[test]
    fn test_classification_is_deterministic() {
        for (w, h) in [(1280, 720), (720, 1280), (800, 600), (3840, 2160)] {
            assert_eq!(
                Classification::from_dimensions(w, h),
                Classification::from_dimensions(w, h)
            );
        }
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(Classification::Landscape.to_string(), "landscape");
        assert_eq!(
            serde_json::to_string(&Classification::Portrait).unwrap(),
            "\"portrait\""
        );
    }
}
