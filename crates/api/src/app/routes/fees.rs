//! Fee schedule: second representative scoped module.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;

use campuserp_core::TenantId;
use campuserp_pipeline::TENANT_FIELD;

use crate::app::errors;
use crate::app::services::{AppServices, FeeRecord};
use crate::middleware::ScopedRequest;

pub fn router() -> Router {
    Router::new().route("/", get(list_fees).post(create_fee))
}

/// GET /fees
pub async fn list_fees(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(scoped): Extension<ScopedRequest>,
) -> impl IntoResponse {
    let tenant = scoped.query_str(TENANT_FIELD);
    Json(json!({ "fees": services.fees.list(tenant) }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeeRequest {
    pub item: String,
    pub amount: u64,
    #[serde(default)]
    pub university_id: Option<TenantId>,
}

/// POST /fees
pub async fn create_fee(
    Extension(services): Extension<Arc<AppServices>>,
    Json(req): Json<CreateFeeRequest>,
) -> axum::response::Response {
    let Some(university_id) = req.university_id else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "universityId is required",
        );
    };

    let record = FeeRecord {
        university_id,
        item: req.item,
        amount: req.amount,
    };
    services.fees.insert(record.clone());

    (StatusCode::CREATED, Json(record)).into_response()
}
