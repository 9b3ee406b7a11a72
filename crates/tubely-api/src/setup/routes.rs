//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubely_core::{Config, StorageBackend};

use crate::constants::{API_PREFIX, ASSETS_PATH};
use crate::handlers;
use crate::middleware::{error_details_middleware, make_request_span, request_id_middleware};
use crate::state::AppState;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    // Limits cover the whole form, boundaries and other fields included.
    let thumbnail_limit = config.max_thumbnail_size_bytes();
    let video_limit = config.max_video_size_bytes();

    let api = Router::new()
        .route(
            "/videos",
            post(handlers::videos::create_video).get(handlers::videos::list_videos),
        )
        .route("/videos/{video_id}", get(handlers::videos::get_video))
        .route(
            "/thumbnail_upload/{video_id}",
            post(handlers::thumbnail_upload::upload_thumbnail)
                .put(handlers::thumbnail_upload::upload_thumbnail)
                .layer(DefaultBodyLimit::max(thumbnail_limit)),
        )
        .route(
            "/video_upload/{video_id}",
            post(handlers::video_upload::upload_video)
                .put(handlers::video_upload::upload_video)
                .layer(DefaultBodyLimit::max(video_limit)),
        )
        .route(
            "/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        );

    let mut app = Router::new()
        .nest(API_PREFIX, api)
        .route("/health", get(handlers::health::health_check));

    if config.storage_backend() == StorageBackend::Local {
        let assets_dir = config.local_storage_path().ok_or_else(|| {
            anyhow::anyhow!("LOCAL_STORAGE_PATH must be set when using local storage backend")
        })?;
        tracing::info!(path = %assets_dir, "Serving local assets at {}", ASSETS_PATH);
        app = app.nest_service(ASSETS_PATH, ServeDir::new(assets_dir));
    }

    let app = app
        .layer(axum::middleware::from_fn_with_state(
            config.is_production(),
            error_details_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<axum::body::Body>))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
