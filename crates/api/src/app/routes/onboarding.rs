//! Onboarding workflow endpoints.
//!
//! These routes are onboarding-exempt by policy: a tenant stuck in setup
//! must still be able to finish setup.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::Value;

use campuserp_auth::Principal;
use campuserp_core::TenantId;
use campuserp_pipeline::TENANT_FIELD;

use crate::app::errors::{self, onboarding_error_to_response};
use crate::app::services::AppServices;
use crate::middleware::ScopedRequest;

pub fn router() -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/stages/:stage", post(submit_stage))
        .route("/activate", post(activate))
}

/// The tenant an onboarding operation addresses: the scoped query for
/// tenant-bound callers (auto-filled by the pipeline), or an explicit
/// `universityId` for the super role.
fn target_tenant(principal: &Principal, scoped: &ScopedRequest) -> Option<TenantId> {
    scoped
        .query_str(TENANT_FIELD)
        .map(TenantId::new)
        .or_else(|| principal.tenant_id.clone())
}

/// GET /onboarding/status
pub async fn status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Extension(scoped): Extension<ScopedRequest>,
) -> axum::response::Response {
    let Some(tenant) = target_tenant(&principal, &scoped) else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "no tenant in scope; pass universityId",
        );
    };

    match services.onboarding.status(&tenant) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => onboarding_error_to_response(e),
    }
}

/// POST /onboarding/stages/:stage
pub async fn submit_stage(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Extension(scoped): Extension<ScopedRequest>,
    Path(stage): Path<u8>,
    Json(body): Json<Value>,
) -> axum::response::Response {
    let Some(tenant) = target_tenant(&principal, &scoped) else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "no tenant in scope; pass universityId",
        );
    };

    match services.onboarding.submit_stage(&tenant, stage, body) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => onboarding_error_to_response(e),
    }
}

/// POST /onboarding/activate
pub async fn activate(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Extension(scoped): Extension<ScopedRequest>,
) -> axum::response::Response {
    let Some(tenant) = target_tenant(&principal, &scoped) else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "no tenant in scope; pass universityId",
        );
    };

    match services.onboarding.activate(&tenant) {
        Ok(tenant_record) => (StatusCode::OK, Json(tenant_record)).into_response(),
        Err(e) => onboarding_error_to_response(e),
    }
}
