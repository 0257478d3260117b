//! Consistent JSON error responses.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use campuserp_onboarding::OnboardingError;
use campuserp_pipeline::PipelineError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

fn json_error_with(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
    extra: serde_json::Value,
) -> axum::response::Response {
    let mut body = json!({
        "error": code,
        "message": message.into(),
    });
    if let (Some(obj), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            obj.insert(k.clone(), v.clone());
        }
    }
    (status, axum::Json(body)).into_response()
}

/// Denials are 403-class policy outcomes; only a store fault is a 5xx.
pub fn pipeline_error_to_response(err: PipelineError) -> axum::response::Response {
    let message = err.to_string();
    match &err {
        PipelineError::ForbiddenRole { required } => json_error_with(
            StatusCode::FORBIDDEN,
            "FORBIDDEN_ROLE",
            message,
            json!({ "requiredRoles": required }),
        ),
        PipelineError::TenantMismatch { surface, presented } => json_error_with(
            StatusCode::FORBIDDEN,
            "FORBIDDEN_TENANT_MISMATCH",
            message,
            json!({ "surface": surface, "presented": presented }),
        ),
        PipelineError::NoTenant => {
            json_error(StatusCode::FORBIDDEN, "FORBIDDEN_NO_TENANT", message)
        }
        PipelineError::OnboardingIncomplete {
            current_stage,
            redirect,
        } => json_error_with(
            StatusCode::FORBIDDEN,
            "ONBOARDING_INCOMPLETE",
            message,
            json!({ "currentStage": current_stage, "redirect": redirect }),
        ),
        PipelineError::StoreUnavailable(_) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE", message)
        }
    }
}

pub fn onboarding_error_to_response(err: OnboardingError) -> axum::response::Response {
    let message = err.to_string();
    match &err {
        OnboardingError::StageSkipped { attempted, current } => json_error_with(
            StatusCode::FORBIDDEN,
            "ONBOARDING_STAGE_SKIPPED",
            message,
            json!({ "attemptedStage": attempted, "currentStage": current }),
        ),
        OnboardingError::InvalidPayload(_) => {
            json_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
        }
        OnboardingError::GoLiveValidationFailed(violations) => json_error_with(
            StatusCode::UNPROCESSABLE_ENTITY,
            "GO_LIVE_VALIDATION_FAILED",
            message,
            json!({ "violations": violations }),
        ),
        OnboardingError::Conflict => json_error(StatusCode::CONFLICT, "CONFLICT", message),
        OnboardingError::Store(_) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE", message)
        }
    }
}
