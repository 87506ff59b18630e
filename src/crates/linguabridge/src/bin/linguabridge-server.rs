//! Linguabridge server binary
//!
//! Serves the back-office JSON API and sweeps overdue job invitations in the
//! background.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use linguabridge::api::{create_router, AppState};
use linguabridge::config::{SecurityMode, ServerConfig};
use linguabridge::db::DatabaseConnection;
use linguabridge::services::invitations;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(rust_log).init();

    tracing::info!("Loading server configuration...");
    let config = ServerConfig::load().context(
        "invalid configuration; set CONFIG_PATH or fix config/linguabridge-server.toml",
    )?;

    tracing::info!("Server name: {}", config.server.name);
    tracing::info!("Security mode: {:?}", config.security.mode);
    tracing::info!("Database path: {}", config.database.path);
    if config.security.mode == SecurityMode::SecretKey && config.get_secret_key().is_none() {
        tracing::warn!("Security mode is secret-key but no key is set; admin routes will reject every request");
    }
    if config.get_webhook_secret().is_none() {
        tracing::warn!("No payment webhook secret configured; /api/v1/webhooks/payments will answer 503");
    }

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("invalid bind address {}", config.bind_address()))?;

    let database_url = config.database_url();
    tracing::info!("Connecting to database: {}", database_url);
    let db = DatabaseConnection::new(&database_url).await?;

    tracing::info!("Running database migrations");
    db.run_migrations().await?;
    db.health_check().await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweep_every = Duration::from_secs(config.matching.expiry_sweep_secs.max(1));
    let sweeper = tokio::spawn(sweep_expired_invitations(db.clone(), sweep_every, shutdown_rx));

    tracing::info!("Building API router");
    let app = create_router(AppState::new(db.clone(), config));

    tracing::info!("Starting linguabridge server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    if let Err(e) = sweeper.await {
        tracing::warn!("Invitation sweeper ended abnormally: {}", e);
    }
    db.close().await;

    tracing::info!("Linguabridge server shut down gracefully");
    Ok(())
}

/// Periodically flip overdue PENDING invitations to EXPIRED
async fn sweep_expired_invitations(
    db: DatabaseConnection,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = invitations::expire_overdue(db.pool(), Utc::now()).await {
                    tracing::error!("Invitation expiry sweep failed: {}", e);
                }
            }
            _ = shutdown.changed() => {
                tracing::debug!("Invitation sweeper stopping");
                break;
            }
        }
    }
}

/// Signal for graceful shutdown (Ctrl-C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for CTRL-C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL-C signal, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down");
        }
    }
}
