use axum::{Json, extract::Extension, response::IntoResponse};
use serde_json::json;

use campuserp_auth::Principal;

/// GET /health - liveness, no auth.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// GET /whoami - echo the resolved principal.
pub async fn whoami(Extension(principal): Extension<Principal>) -> impl IntoResponse {
    Json(principal)
}
