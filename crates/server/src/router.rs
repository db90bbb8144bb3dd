use super::{errors::AppError, handlers, state::AppState};
use axum::{
    body::HttpBody,
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware::map_response,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    let body_limit = app_state.config.max_upload_bytes;
    let server_timeout = Duration::from_secs(app_state.config.server_timeout_secs);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            "/generate_presentation",
            post(handlers::generate_presentation_handler)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(app_state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            server_timeout,
        ))
        .layer(map_response(describe_timeout))
        .layer(TraceLayer::new_for_http())
}

/// `TimeoutLayer` answers with an empty body. Handler errors always carry a
/// message, so an empty 504 can only come from the deadline.
async fn describe_timeout(response: Response) -> Response {
    if response.status() == StatusCode::GATEWAY_TIMEOUT && response.body().is_end_stream() {
        return AppError::RequestTimeout.into_response();
    }
    response
}
