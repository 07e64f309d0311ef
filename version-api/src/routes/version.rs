use crate::routes::AppState;
use axum::{Json, extract::State, http::StatusCode};
use tracing::{error, info};
use version_api_models::version::VersionInfo;

pub(crate) async fn handler(state: State<AppState>) -> Result<Json<VersionInfo>, StatusCode> {
    info!("GET /api/v1/version endpoint called");
    match state.services.version.version_info() {
        Ok(version_info) => {
            info!("Successfully retrieved version information");
            Ok(Json(version_info))
        }
        Err(e) => {
            error!("Failed to retrieve version information: {e}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
