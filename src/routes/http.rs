// GET handler: Prometheus exposition

use axum::{
    extract::State,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};

use super::AppState;

pub(super) const GET_ONLY_BODY: &str = "Support GET only";

/// GET (any path): renders the registry as it stood after the last completed cycle.
pub(super) async fn metrics_handler(method: Method, State(state): State<AppState>) -> Response {
    if method != Method::GET {
        return (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/html")],
            GET_ONLY_BODY,
        )
            .into_response();
    }

    match state.registry.render().await {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, state.registry.content_type())],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, operation = "render_metrics", "Metrics encoding failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
