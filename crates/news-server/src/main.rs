//! News Server
//!
//! A small CRUD service for news items over HTTP/JSON. Items live either in
//! PostgreSQL or in process memory, chosen at startup with `NEWS_BACKEND`.

mod config;
mod error;
mod handlers;
mod storage;

use anyhow::{Context, Result};
use axum::{
    routing::{get, put},
    Router,
};
use news_core::NewsStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use config::{BackendKind, Config};
use storage::{Database, MemoryStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn NewsStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn NewsStore>) -> Self {
        Self { store }
    }
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting News Server v{}", env!("CARGO_PKG_VERSION"));
    info!("PID: {}", std::process::id());

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    info!("Loading configuration...");
    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, backend={}",
        config.bind_address, config.backend
    );

    let store = build_store(&config);
    let app = build_router(AppState::new(store));

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Server ready to accept connections");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn build_store(config: &Config) -> Arc<dyn NewsStore> {
    match config.backend {
        BackendKind::Postgres => {
            info!(
                "Using PostgreSQL backend: {:?}, retry={:?}",
                config.db, config.retry
            );
            if config.db.host.is_none() {
                warn!("DB_HOST not set, storage requests will fail until it is configured");
            }
            Arc::new(Database::new(config.db.clone(), config.retry))
        }
        BackendKind::Memory => {
            info!("Using in-memory backend, data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    }
}

pub(crate) fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/db-health", get(handlers::db_health))
        .route(
            "/news",
            get(handlers::news::list).post(handlers::news::create),
        )
        .route(
            "/news/:id",
            put(handlers::news::update).delete(handlers::news::delete),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
