//! Leadline API Server Entry Point
//!
//! Bootstraps configuration, connects the PostgreSQL pool, and starts
//! the Axum HTTP server.

use std::net::SocketAddr;

use axum::Router;
use leadline_api::telemetry::{init_tracing, TelemetryConfig};
use leadline_api::{
    create_api_router, ApiConfig, ApiError, ApiResult, AuthConfig, DbClient, DbConfig,
    TwilioConfig,
};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::default();
    init_tracing(&telemetry_config)?;

    let db_config = DbConfig::from_env();
    let db = DbClient::from_config(&db_config)?;

    let api_config = ApiConfig::from_env();
    let auth_config = AuthConfig::from_env();
    let twilio_config = TwilioConfig::from_env();

    let addr = resolve_bind_addr(&api_config)?;

    let app: Router = create_api_router(db, twilio_config, &api_config, auth_config)?;

    tracing::info!(%addr, "Starting Leadline API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn resolve_bind_addr(config: &ApiConfig) -> ApiResult<SocketAddr> {
    let addr = format!("{}:{}", config.bind, config.port);
    addr.parse::<SocketAddr>()
        .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
}
