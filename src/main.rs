use clap::Parser;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tubely_backend::config::AppConfig;
use tubely_backend::infrastructure::{database, storage};
use tubely_backend::services::media::FfmpegTool;
use tubely_backend::services::upload_service::VideoUploadService;
use tubely_backend::services::videos::SeaOrmVideoRepository;
use tubely_backend::{AppState, create_app};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port for the API server (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tubely_backend=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting Tubely Backend...");

    let mut config = AppConfig::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    info!(
        "🛡️  Upload Config: Max Size={}MB, Staging={:?}",
        config.max_upload_size / 1024 / 1024,
        config.staging_dir
    );

    let db = database::setup_database(&config.database_url).await?;
    let videos = Arc::new(SeaOrmVideoRepository::new(db));
    let storage_service = storage::setup_storage(&config).await;

    let media = FfmpegTool::new(config.ffmpeg_path.clone(), config.ffprobe_path.clone());
    if !media.ffprobe_available() {
        warn!("⚠️  {:?} not found, uploads will fail at probing", config.ffprobe_path);
    }
    if !media.ffmpeg_available() {
        warn!("⚠️  {:?} not found, uploads will fail at remuxing", config.ffmpeg_path);
    }

    let upload_service = Arc::new(VideoUploadService::new(
        videos.clone(),
        storage_service,
        Arc::new(media),
        config.clone(),
    ));

    let state = AppState {
        videos,
        upload_service,
        config: config.clone(),
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::http::Request<_>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        })
        .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
            info!("📥 {} {}", request.method(), request.uri());
        })
        .on_response(
            |response: &axum::http::Response<_>,
             latency: std::time::Duration,
             _span: &tracing::Span| {
                info!(
                    "📤 Finished in {:?} with status {}",
                    latency,
                    response.status()
                );
            },
        );

    let app = create_app(state).layer(trace_layer);
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr = listener.local_addr()?;

    info!("✅ API Server listening on: http://{}", addr);
    info!("📖 Swagger UI documentation: http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Backend exited cleanly.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("⌨️  Ctrl+C received, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("💤 SIGTERM received, initiating graceful shutdown...");
        },
    }
}
