//! Representative tenant-scoped domain module.
//!
//! Handlers filter by the *effective* query the pipeline produced; there is
//! no tenant logic here, which is the whole point of the pipeline.

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
use uuid::Uuid;

use campuserp_core::{DepartmentId, TenantId};
use campuserp_pipeline::{DEPARTMENT_FIELD, TENANT_FIELD};

use crate::app::errors;
use crate::app::services::{AppServices, StudentRecord};
use crate::middleware::ScopedRequest;

pub fn router() -> Router {
    Router::new().route("/", get(list_students).post(create_student))
}

/// GET /students
pub async fn list_students(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(scoped): Extension<ScopedRequest>,
) -> impl IntoResponse {
    let tenant = scoped.query_str(TENANT_FIELD);
    let department = scoped.query_str(DEPARTMENT_FIELD);

    let students = services.students.list(tenant, department);

    Json(json!({
        "students": students,
        "filters": {
            (TENANT_FIELD): tenant,
            (DEPARTMENT_FIELD): department,
        },
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
    /// Filled by auto-scoping for tenant-bound callers; the super role must
    /// pass it explicitly.
    #[serde(default)]
    pub university_id: Option<TenantId>,
}

/// POST /students
pub async fn create_student(
    Extension(services): Extension<Arc<AppServices>>,
    Json(req): Json<CreateStudentRequest>,
) -> axum::response::Response {
    let Some(university_id) = req.university_id else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "universityId is required",
        );
    };

    let record = StudentRecord {
        id: Uuid::now_v7(),
        university_id,
        department_id: req.department_id,
        name: req.name,
        email: req.email,
    };
    services.students.insert(record.clone());

    (StatusCode::CREATED, Json(record)).into_response()
}
