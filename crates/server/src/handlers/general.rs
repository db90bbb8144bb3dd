use axum::response::Html;

/// The handler for the root (`/`) endpoint: the upload form.
pub async fn root() -> Html<&'static str> {
    Html(include_str!("../../templates/generate_presentation.html"))
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}
