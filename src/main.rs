use std::time::Duration;

use anyhow::Context;
use axum::http::HeaderValue;
use tokio::sync::oneshot;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use todo_api::app::{app, AppState};
use todo_api::auth::{PasswordHasher, TokenService};
use todo_api::config::{config, SecurityConfig};
use todo_api::database::{DatabaseManager, Repository};
use todo_api::services::AuthService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("todo_api=info,tower_http=info")),
        )
        .init();

    let config = config();
    config.validate().context("invalid configuration")?;
    info!("Starting todo API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    DatabaseManager::run_migrations(&pool)
        .await
        .context("failed to apply migrations")?;

    let tokens = TokenService::from_config(&config.security).context("invalid token settings")?;
    let repo = Repository::postgres(pool.clone());
    let auth = AuthService::new(
        repo.users.clone(),
        PasswordHasher::new(config.security.password_salt.clone()),
        tokens,
    );

    let mut router = app(AppState::new(auth, repo));
    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security));
    }

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("todo API listening on http://{}", bind_addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            DatabaseManager::close(pool).await;
            return match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e).context("server stopped unexpectedly"),
                Err(e) => Err(e).context("server task failed"),
            };
        }
        _ = shutdown_signal() => {}
    }

    let grace = Duration::from_secs(config.server.shutdown_grace_secs);
    info!(grace_secs = grace.as_secs(), "shutdown requested, draining in-flight requests");
    let _ = shutdown_tx.send(());

    match tokio::time::timeout(grace, &mut server).await {
        Ok(Ok(Ok(()))) => info!("server drained"),
        Ok(Ok(Err(e))) => error!("server error during shutdown: {}", e),
        Ok(Err(e)) => error!("server task failed during shutdown: {}", e),
        Err(_) => {
            warn!("grace period elapsed, abandoning remaining requests");
            server.abort();
        }
    }

    DatabaseManager::close(pool).await;
    info!("shutdown complete");
    Ok(())
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for ctrl-c: {}", e);
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
                error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c"),
        _ = terminate => info!("received SIGTERM"),
    }
}
