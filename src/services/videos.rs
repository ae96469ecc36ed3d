use crate::entities::{prelude::*, videos};
use crate::models::Video;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};
use uuid::Uuid;

/// Video metadata store.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>>;

    /// Persist the mutable fields of an existing record.
    async fn update_video(&self, video: &Video) -> Result<()>;

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

pub struct SeaOrmVideoRepository {
    db: DatabaseConnection,
}

impl SeaOrmVideoRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VideoRepository for SeaOrmVideoRepository {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>> {
        let video = Videos::find_by_id(id).one(&self.db).await?;
        Ok(video.map(Video::from))
    }

    async fn update_video(&self, video: &Video) -> Result<()> {
        let active = videos::ActiveModel {
            id: Unchanged(video.id),
            title: Set(video.title.clone()),
            description: Set(video.description.clone()),
            thumbnail_url: Set(video.thumbnail_url.clone()),
            video_url: Set(video.video_url.clone()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };

        active.update(&self.db).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.db.ping().await?;
        Ok(())
    }
}
