use std::time::Duration;

use campuserp_audit::MonitorConfig;

#[tokio::main]
async fn main() {
    campuserp_observability::init();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let mut monitor_config = MonitorConfig::default();
    if let Ok(period) = std::env::var("MONITOR_PERIOD_SECS") {
        if let Ok(secs) = period.parse::<u64>() {
            monitor_config.period = Duration::from_secs(secs);
        }
    }
    if let Ok(threshold) = std::env::var("MONITOR_MUTATION_THRESHOLD") {
        if let Ok(threshold) = threshold.parse::<usize>() {
            monitor_config.actor_mutation_threshold = threshold;
        }
    }

    let app = campuserp_api::app::build_app_with(jwt_secret, monitor_config).await;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
