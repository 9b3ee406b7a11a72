//! Error bodies carry only the client message and code by default. Outside
//! production this layer swaps in the body with `details` and `error_type`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorDetails;

/// `State` is `Config::is_production()`.
pub async fn error_details_middleware(
    State(production): State<bool>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(ErrorDetails(details)) = response.extensions_mut().remove::<ErrorDetails>() else {
        return response;
    };
    if production {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    let detailed = Json(details).into_response();
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    Response::from_parts(parts, detailed.into_body())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpAppError;
    use axum::{http::StatusCode, routing::get, Router};
    use axum_test::TestServer;
    use serde_json::Value;
    use tubely_core::AppError;

    async fn rejected() -> Result<(), HttpAppError> {
        Err(AppError::BadRequest("title must not be empty".into()).into())
    }

    fn server(production: bool) -> TestServer {
        let app = Router::new()
            .route("/", get(rejected))
            .layer(axum::middleware::from_fn_with_state(
                production,
                error_details_middleware,
            ));
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_details_shown_outside_production() {
        let response = server(false).get("/").await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(body["error_type"], "BadRequest");
        assert!(body["details"].as_str().unwrap().contains("title must not be empty"));
    }

    #[tokio::test]
    async fn test_details_hidden_in_production() {
        let response = server(true).get("/").await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "BAD_REQUEST");
        assert!(body.get("details").is_none());
        assert!(body.get("error_type").is_none());
    }
}
