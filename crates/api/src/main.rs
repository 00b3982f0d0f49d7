use std::net::SocketAddr;
use std::sync::Arc;

use leaseflow_db::store::{MemStorage, PgStorage, Storage};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leaseflow_api::config::ServerConfig;
use leaseflow_api::router::build_app_router;
use leaseflow_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leaseflow_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage backend ---
    // STORAGE_BACKEND=memory runs without a database; anything else expects
    // DATABASE_URL and applies migrations on startup.
    let backend = std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "postgres".into());
    let (storage, pool): (Arc<dyn Storage>, _) = match backend.as_str() {
        "memory" => {
            tracing::warn!("Using in-memory storage; all data is lost on shutdown");
            (Arc::new(MemStorage::new()), None)
        }
        "postgres" => {
            let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

            let pool = leaseflow_db::create_pool(&database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            leaseflow_db::health_check(&pool)
                .await
                .expect("Database health check failed");

            leaseflow_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            (Arc::new(PgStorage::new(pool.clone())), Some(pool))
        }
        other => panic!("Unknown STORAGE_BACKEND '{other}' (expected 'postgres' or 'memory')"),
    };

    // --- App state / router ---
    let state = AppState {
        storage,
        config: Arc::new(config.clone()),
        pool,
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
