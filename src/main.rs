//! The todo service's web server.

use anyhow::Context;
use tokio::net::TcpListener;
use todo_service::{api, config::Config, db, telemetry};
use tracing::{error, info};

/// # Errors
///
/// See implementation.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load `.env` before anything reads the environment. A missing file is fine.
    _ = dotenvy::dotenv();

    telemetry::init()?;

    let config = Config::from_env().context("failed to load configuration")?;

    let db_pool = db::initialize(&config.db);

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to listen on {}", config.listen_addr))?;

    info!(
        addr = %listener.local_addr()?,
        validate_todo = config.api.validate_todo,
        cors_enabled = config.api.cors_enabled,
        "Running"
    );

    axum::serve(listener, api::router(db_pool.clone(), config.api))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db_pool.close().await;

    info!("Shut down");

    Ok(())
}

/// Waits for Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            error!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                error!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
