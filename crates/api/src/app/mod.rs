//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: infrastructure wiring (pipeline, stores, recorder)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use campuserp_audit::{BehavioralMonitor, MonitorConfig};
use campuserp_auth::{Hs256TokenCodec, TokenCodec};

use crate::middleware;

pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(jwt_secret: String) -> Router {
    build_app_with(jwt_secret, MonitorConfig::default()).await
}

/// Build the router with explicit monitor tuning.
pub async fn build_app_with(jwt_secret: String, monitor_config: MonitorConfig) -> Router {
    let codec: Arc<dyn TokenCodec> = Arc::new(Hs256TokenCodec::new(jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState { codec };

    let services = Arc::new(services::build_services());

    // Out-of-band abuse scan over the audit trail.
    let _monitor = Arc::new(BehavioralMonitor::new(
        services.audit_store.clone(),
        monitor_config,
    ))
    .spawn();

    // Protected routes: authentication, then admission, then handlers.
    let protected = routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                auth_state.clone(),
                middleware::auth_middleware,
            ))
            .layer(axum::middleware::from_fn_with_state(
                services.clone(),
                middleware::admission_middleware,
            ))
            .layer(Extension(services)),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/auth", routes::auth::router())
        .layer(Extension(auth_state))
        .merge(protected)
}
