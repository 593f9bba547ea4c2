// HTTP exposition routes

mod http;

use axum::Router;
use axum::http::StatusCode;
use std::sync::Arc;
use tokio::time::Duration;
use tower_http::timeout::TimeoutLayer;

use crate::metrics::MetricRegistry;

/// Inbound request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) registry: Arc<MetricRegistry>,
}

/// Every path serves the metrics on GET; any other method gets 404.
pub fn app(registry: Arc<MetricRegistry>) -> Router {
    let state = AppState { registry };
    Router::new()
        .fallback(http::metrics_handler) // GET *
        .layer(timeout_layer())
        .with_state(state)
}

/// Requests still running after [`REQUEST_TIMEOUT`] are answered with 408.
fn timeout_layer() -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, REQUEST_TIMEOUT)
}
