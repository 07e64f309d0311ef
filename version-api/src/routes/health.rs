use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;
use version_api_models::health::HEALTH_OK;

pub(crate) async fn handler() -> Response {
    debug!("Health check endpoint called");
    (StatusCode::OK, HEALTH_OK).into_response()
}
