use crate::entities::videos;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::time::Duration;
use tracing::info;

pub async fn setup_database(db_url: &str) -> anyhow::Result<DatabaseConnection> {
    info!("📂 Database: {}", db_url);

    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(20)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;

    info!("✅ Database connected successfully");

    run_migrations(&db).await?;

    Ok(db)
}

pub async fn run_migrations(db: &DatabaseConnection) -> anyhow::Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    info!("🔄 Running auto-migrations...");

    let stmt = schema
        .create_table_from_entity(videos::Entity)
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&stmt)).await?;
    info!("   - Table 'videos' checked/created");

    let index = "CREATE INDEX IF NOT EXISTS idx_videos_user_id ON videos(user_id)";
    if let Err(e) = db
        .execute(sea_orm::Statement::from_string(builder, index.to_owned()))
        .await
    {
        tracing::warn!("   - Schema update warning: {} -> {}", index, e);
    }

    Ok(())
}
