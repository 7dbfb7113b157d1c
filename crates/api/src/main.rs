use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use baitong_api::background::revocation_cleanup;
use baitong_api::bootstrap::ensure_admin;
use baitong_api::config::ServerConfig;
use baitong_api::router::build_app_router;
use baitong_api::state::AppState;
use baitong_sensors::SensorReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "baitong_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid configuration")?;
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let pool = baitong_db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    baitong_db::health_check(&pool)
        .await
        .context("Database health check failed")?;

    baitong_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    if ensure_admin(&pool, &config.admin_identity, &config.admin_password)
        .await
        .context("Failed to seed admin account")?
    {
        tracing::info!(identity = %config.admin_identity, "Admin account created");
    }

    // --- Time-series store ---
    let sensors =
        SensorReader::from_settings(&config.sensors).context("Failed to build sensor client")?;
    match sensors.verify_measurement().await {
        Ok(true) => tracing::info!(measurement = sensors.measurement(), "Sensor measurement found"),
        Ok(false) => tracing::warn!(
            measurement = sensors.measurement(),
            "Sensor measurement not found; snapshots will be empty"
        ),
        Err(e) => tracing::warn!(error = %e, "Could not verify sensor measurement"),
    }

    // --- Background jobs ---
    let cancel = CancellationToken::new();
    let cleanup_handle = if config.revocation_cleanup_interval_secs > 0 {
        Some(tokio::spawn(revocation_cleanup::run(
            pool.clone(),
            Duration::from_secs(config.revocation_cleanup_interval_secs),
            cancel.clone(),
        )))
    } else {
        tracing::info!("Revocation cleanup disabled");
        None
    };

    // --- App state + router ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        sensors,
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let ip = config
        .host
        .parse::<IpAddr>()
        .with_context(|| format!("Invalid HOST address '{}'", config.host))?;
    let addr = SocketAddr::new(ip, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    cancel.cancel();
    if let Some(handle) = cleanup_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
