//! Token issuance for development and tests.
//!
//! Production deployments sit behind the institutional identity provider;
//! this endpoint mints HS256 tokens from the shared dev secret so the rest
//! of the pipeline can be exercised end to end.

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;

use campuserp_auth::{JwtClaims, Role, validate_claims};
use campuserp_core::{DepartmentId, SubjectId, TenantId};

use crate::app::errors;
use crate::middleware::AuthState;

pub fn router() -> Router {
    Router::new().route("/token", post(mint_token))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub role: Role,
    #[serde(default)]
    pub university_id: Option<TenantId>,
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: i64,
}

fn default_ttl_minutes() -> i64 {
    60
}

/// POST /auth/token
pub async fn mint_token(
    Extension(state): Extension<AuthState>,
    Json(req): Json<TokenRequest>,
) -> axum::response::Response {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: SubjectId::new(),
        name: req.name,
        role: req.role,
        tenant_id: req.university_id,
        department_id: req.department_id,
        issued_at: now,
        expires_at: now + Duration::minutes(req.ttl_minutes),
    };

    if let Err(e) = validate_claims(&claims, now) {
        return errors::json_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string());
    }

    match state.codec.encode(&claims) {
        Ok(token) => (
            StatusCode::OK,
            Json(json!({ "token": token, "expiresAt": claims.expires_at })),
        )
            .into_response(),
        Err(e) => errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "TOKEN_ENCODING_FAILED",
            e.to_string(),
        ),
    }
}
