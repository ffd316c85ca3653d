//! Course Review API Server Entry Point
//!
//! Loads configuration from the environment, builds the shared clients, and
//! starts the Axum HTTP server. Missing required configuration stops startup.

use axum::Router;
use coursereview_api::telemetry::{init_tracer, TelemetryConfig};
use coursereview_api::{
    create_api_router, ApiConfig, ApiError, ApiResult, AppState, BackendClient, BackendConfig,
    Environment, RevalidationConfig, Revalidator,
};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::default();
    init_tracer(&telemetry_config)?;

    let environment = Environment::from_env();
    let api_config = ApiConfig::from_env()?;
    let backend_config = BackendConfig::from_env()?;
    let revalidation_config = RevalidationConfig::from_env(environment)?;

    tracing::info!(
        ?environment,
        backend_url = %backend_config.url,
        revalidate_url = %revalidation_config.endpoint(),
        "Configuration loaded"
    );

    let http = api_config.http_client()?;
    let state = AppState::new(
        BackendClient::new(backend_config, http.clone()),
        Revalidator::new(revalidation_config, http),
    );

    let app: Router = create_api_router(state, &api_config);

    let addr = api_config.bind_addr()?;
    tracing::info!(%addr, "Starting Course Review API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or on SIGTERM where available.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
