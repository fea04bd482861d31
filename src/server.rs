//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, component wiring, the bucket sweep task and the
//! Axum server lifecycle.

use crate::application::services::{AuthService, MessageService};
use crate::config::Config;
use crate::gateway::{AccessPolicy, Gateway, RateLimiter, SecurityHeaders};
use crate::infrastructure::credentials::HmacCredentials;
use crate::infrastructure::persistence::{PgContactFormRepository, PgInternalMessageRepository};
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

/// Opens the PostgreSQL pool with the configured limits.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

/// Builds the shared state from the configuration and an open pool.
///
/// # Errors
///
/// Returns an error if `cors_origin` is not a valid header value.
pub fn build_state(config: &Config, pool: PgPool) -> Result<AppState> {
    let pool = Arc::new(pool);

    let verifier = Arc::new(HmacCredentials::new(config.session_signing_secret.as_bytes()));
    let auth_service = Arc::new(AuthService::new(verifier));

    let limiter = Arc::new(RateLimiter::new(config.rate_limits));
    let headers =
        SecurityHeaders::new(&config.cors_origin).context("CORS_ORIGIN is not a valid header")?;

    let gateway = Arc::new(Gateway::new(
        auth_service,
        AccessPolicy::default(),
        limiter,
        headers,
        config.behind_proxy,
    ));

    let message_service = Arc::new(MessageService::new(
        Arc::new(PgInternalMessageRepository::new(pool.clone())),
        Arc::new(PgContactFormRepository::new(pool)),
    ));

    Ok(AppState::new(gateway, message_service))
}

/// Periodically drops buckets whose window has elapsed.
///
/// Expired buckets are already treated as empty on access; the sweep only
/// bounds memory for clients that never come back.
pub fn spawn_bucket_sweep(limiter: Arc<RateLimiter>, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let removed = limiter.purge_expired();
            if removed > 0 {
                tracing::debug!(removed, remaining = limiter.bucket_count(), "Swept expired buckets");
            }
        }
    });
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to register SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("SIGINT received, shutting down"),
        _ = terminate => tracing::info!("SIGTERM received, shutting down"),
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Gateway (session verifier, access policy, rate limiter)
/// - Message service over both origin stores
/// - Bucket sweep task (unless disabled)
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
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let state = build_state(&config, pool)?;

    if config.rate_limit_sweep_seconds > 0 {
        spawn_bucket_sweep(
            state.gateway.limiter().clone(),
            Duration::from_secs(config.rate_limit_sweep_seconds),
        );
        tracing::info!(
            "Bucket sweep started (every {}s)",
            config.rate_limit_sweep_seconds
        );
    }

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}
