//! Read-only audit listing for tenant and platform reporting.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::DateTime;
use serde_json::json;

use campuserp_audit::{AuditAction, AuditQuery};
use campuserp_core::{SubjectId, TenantId};
use campuserp_pipeline::TENANT_FIELD;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::middleware::ScopedRequest;

pub fn router() -> Router {
    Router::new().route("/", get(list_audit))
}

/// GET /audit
///
/// Filters: `universityId` (auto-scoped for tenant callers), `actorId`,
/// `module`, `action`, `from`, `to`, `limit`.
pub async fn list_audit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(scoped): Extension<ScopedRequest>,
) -> axum::response::Response {
    let mut query = AuditQuery {
        tenant_id: scoped.query_str(TENANT_FIELD).map(TenantId::new),
        module: scoped.query_str("module").map(str::to_string),
        action: scoped.query_str("action").map(AuditAction::from),
        ..Default::default()
    };

    if let Some(actor) = scoped.query_str("actorId") {
        match actor.parse::<SubjectId>() {
            Ok(actor) => query.actor_id = Some(actor),
            Err(_) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "actorId must be a UUID",
                );
            }
        }
    }

    for (param, slot) in [("from", &mut query.from), ("to", &mut query.to)] {
        if let Some(raw) = scoped.query_str(param) {
            match DateTime::parse_from_rfc3339(raw) {
                Ok(ts) => *slot = Some(ts.to_utc()),
                Err(_) => {
                    return errors::json_error(
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        format!("{param} must be an RFC 3339 timestamp"),
                    );
                }
            }
        }
    }

    if let Some(limit) = scoped.query_str("limit") {
        match limit.parse::<usize>() {
            Ok(limit) => query.limit = Some(limit),
            Err(_) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "limit must be an integer",
                );
            }
        }
    }

    match services.audit_store.query(query).await {
        Ok(records) => (StatusCode::OK, Json(json!({ "records": records }))).into_response(),
        Err(e) => errors::json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "STORE_UNAVAILABLE",
            e.to_string(),
        ),
    }
}
