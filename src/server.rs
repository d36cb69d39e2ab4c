//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, bot verifier, rate limiter sweep and
//! the Axum server lifecycle.

use crate::application::rate_limiter::{RateLimiter, spawn_sweeper};
use crate::application::services::LinkService;
use crate::config::Config;
use crate::infrastructure::persistence::PgUrlRepository;
use crate::infrastructure::verification::TurnstileVerifier;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Turnstile verifier
/// - Rate limiter and its background sweep
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("Database ping failed")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let verifier = TurnstileVerifier::new(
        config.turnstile_verify_url.clone(),
        config.turnstile_secret.clone(),
        config.turnstile_timeout(),
    )
    .context("Failed to build Turnstile client")?;

    let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit_policy()));
    let sweeper = spawn_sweeper(&rate_limiter, config.rate_limit_sweep_interval());
    tracing::info!("Rate limit sweeper started");

    let repository = Arc::new(PgUrlRepository::new(Arc::new(pool)));
    let link_service = Arc::new(LinkService::new(
        repository,
        Arc::new(verifier),
        rate_limiter,
        config.domain.clone(),
    ));

    let state = AppState::new(link_service);
    let app = app_router(state, &config.cors_allowed_origins)?;

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    sweeper.abort();
    tracing::info!("Server stopped");

    Ok(())
}

async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
