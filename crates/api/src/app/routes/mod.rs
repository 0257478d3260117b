use axum::{Router, routing::get};

pub mod audit;
pub mod auth;
pub mod fees;
pub mod onboarding;
pub mod students;
pub mod system;
pub mod universities;

/// Router for all authenticated (pipeline-admitted) endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/onboarding", onboarding::router())
        .nest("/students", students::router())
        .nest("/fees", fees::router())
        .nest("/universities", universities::router())
        .nest("/audit", audit::router())
}
