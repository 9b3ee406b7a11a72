//! Video record endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tubely_core::{AppError, CreateVideoRequest, Video};

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::parse_video_id;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Video record created", body = Video),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<CreateVideoRequest>,
) -> Result<(StatusCode, Json<Video>), HttpAppError> {
    let user_id = state.auth.authenticate(&headers)?;

    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("Title must not be empty".to_string()).into());
    }

    let description = request
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    let video = Video::new(user_id, title.to_string(), description);
    state.videos.create_video(&video).await?;

    tracing::info!(video_id = %video.id, user_id = %user_id, "Video record created");

    Ok((StatusCode::CREATED, Json(video)))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses(
        (status = 200, description = "Caller's videos, newest first", body = Vec<Video>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Video>>, HttpAppError> {
    let user_id = state.auth.authenticate(&headers)?;

    let videos = state.videos.list_videos_for_user(user_id).await?;
    let videos = state.linker.link_all(videos).await?;

    Ok(Json(videos))
}

#[utoipa::path(
    get,
    path = "/api/videos/{videoID}",
    tag = "videos",
    params(
        ("videoID" = String, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video record with signed locators", body = Video),
        (status = 400, description = "Invalid video ID", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let user_id = state.auth.authenticate(&headers)?;

    let video = state.uploads.authorize(video_id, user_id).await?;
    let video = state.linker.link(video).await?;

    Ok(Json(video))
}
