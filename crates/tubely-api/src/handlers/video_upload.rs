use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::HeaderMap,
    Json,
};
use tubely_core::Video;

use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::parse_video_id;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/video_upload/{videoID}",
    tag = "uploads",
    params(
        ("videoID" = String, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "Form with a `video` file part (video/mp4)"),
    responses(
        (status = 200, description = "Video processed and stored", body = Video),
        (status = 400, description = "Invalid ID, form or content type", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "Video too large", body = ErrorResponse),
        (status = 500, description = "Probe, processing, storage or database failure", body = ErrorResponse)
    )
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let user_id = state.auth.authenticate(&headers)?;

    tracing::debug!(video_id = %video_id, user_id = %user_id, "Uploading video");

    let video = state
        .uploads
        .upload_video(video_id, user_id, multipart)
        .await?;

    tracing::info!(
        video_id = %video.id,
        "Video upload complete"
    );

    Ok(Json(video))
}
