//! Tenant records addressed directly by id.
//!
//! The isolation enforcer has already verified the id segment equals the
//! caller's own tenant (or the caller is the super role).

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use campuserp_core::TenantId;
use campuserp_onboarding::TenantDirectory;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/:id", get(get_university))
}

/// GET /universities/:id
pub async fn get_university(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.directory.get(&TenantId::new(id)) {
        Ok(Some(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "university not found"),
        Err(e) => errors::json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "STORE_UNAVAILABLE",
            e.to_string(),
        ),
    }
}
