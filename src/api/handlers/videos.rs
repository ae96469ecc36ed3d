use crate::api::error::AppError;
use crate::models::Video;
use crate::services::staging::StagingError;
use crate::services::upload_service::UploadError;
use crate::utils::auth::Principal;
use axum::{
    Json,
    extract::{Extension, Multipart, Path, State, multipart::MultipartError},
    http::StatusCode,
};
use futures::TryStreamExt;
use tokio_util::io::StreamReader;
use uuid::Uuid;

/// Multipart field carrying the video bytes.
pub const VIDEO_FIELD: &str = "video";

fn exceeds_limit(err: &MultipartError) -> bool {
    err.status() == StatusCode::PAYLOAD_TOO_LARGE
        || err.body_text().contains("length limit exceeded")
}

fn multipart_error(err: MultipartError) -> AppError {
    if exceeds_limit(&err) {
        AppError::BadRequest("Request body exceeds the maximum allowed limit".to_string())
    } else {
        tracing::info!("Rejected multipart body: {}", err.body_text());
        AppError::BadRequest("Couldn't parse file".to_string())
    }
}

/// A body cut off by the request limit reaches staging as an I/O error.
fn upload_error(err: UploadError) -> AppError {
    if let UploadError::Staging(StagingError::Io(io_err)) = &err {
        let over_limit = io_err
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<MultipartError>())
            .is_some_and(exceeds_limit);
        if over_limit {
            return AppError::BadRequest(
                "Request body exceeds the maximum allowed limit".to_string(),
            );
        }
    }
    err.into()
}

#[utoipa::path(
    post,
    path = "/api/video_upload/{video_id}",
    params(
        ("video_id" = String, Path, description = "Video record ID")
    ),
    request_body(content = Multipart, description = "MP4 file in the `video` field"),
    responses(
        (status = 200, description = "Video uploaded and linked", body = Video),
        (status = 400, description = "Invalid ID, body or media type"),
        (status = 401, description = "Missing, invalid or foreign credential"),
        (status = 404, description = "Video record not found"),
        (status = 500, description = "Processing or storage failure")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "videos"
)]
pub async fn upload_video(
    State(state): State<crate::AppState>,
    Extension(principal): Extension<Principal>,
    Path(video_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Video>, AppError> {
    let video_id = Uuid::parse_str(&video_id)
        .map_err(|_| AppError::BadRequest("Invalid video ID".to_string()))?;

    let video = state
        .upload_service
        .authorize(principal.user_id, video_id)
        .await?;

    tracing::info!("📤 Uploading video {} by user {}", video_id, principal.user_id);

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(|s| s.to_string());
        let reader = StreamReader::new(field.map_err(std::io::Error::other));

        let result = state
            .upload_service
            .ingest(video, content_type.as_deref(), reader)
            .await;

        return match result {
            Ok(video) => Ok(Json(video)),
            Err(err) => {
                // Consume the rest of the body so the client sees the response
                while let Ok(Some(_)) = multipart.next_field().await {}
                Err(upload_error(err))
            }
        };
    }

    Err(AppError::BadRequest("Couldn't parse file".to_string()))
}
