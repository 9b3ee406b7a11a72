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
    path = "/api/thumbnail_upload/{videoID}",
    tag = "uploads",
    params(
        ("videoID" = String, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "Form with a `thumbnail` file part (image/jpeg or image/png)"),
    responses(
        (status = 200, description = "Thumbnail stored", body = Video),
        (status = 400, description = "Invalid ID, form or content type", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "Thumbnail too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let user_id = state.auth.authenticate(&headers)?;

    tracing::debug!(video_id = %video_id, user_id = %user_id, "Uploading thumbnail");

    let video = state
        .uploads
        .upload_thumbnail(video_id, user_id, multipart)
        .await?;

    Ok(Json(video))
}
