//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use tubely_core::{CreateVideoRequest, Orientation, Video};

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tubely API",
        version = "0.1.0",
        description = "Video records with thumbnail and video uploads. Uploaded videos are classified by orientation, rewritten for fast start and published to local or S3 storage."
    ),
    paths(
        handlers::videos::create_video,
        handlers::videos::list_videos,
        handlers::videos::get_video,
        handlers::thumbnail_upload::upload_thumbnail,
        handlers::video_upload::upload_video,
    ),
    components(
        schemas(
            Video,
            CreateVideoRequest,
            Orientation,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "videos", description = "Video record operations"),
        (name = "uploads", description = "Thumbnail and video uploads")
    )
)]
pub struct ApiDoc;
