//! duum-back binary entrypoint wiring the REST API to its storage backend.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use duum_back::{
    config::{AppConfig, StorageBackend},
    dao::{
        storage::StorageError,
        store::{MemoryStore, Store},
    },
    routes,
    services::storage_supervisor,
    state::{AppState, SharedState, SystemClock},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let port = config.port;
    let app_state = AppState::new(config, Arc::new(SystemClock));

    spawn_storage_supervisor(app_state.clone())?;
    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Start the background task that connects the configured backend and installs it.
fn spawn_storage_supervisor(state: SharedState) -> anyhow::Result<()> {
    let backend = state.config().storage;
    match backend {
        StorageBackend::Memory => {
            info!("using in-memory storage; records are lost on restart");
            tokio::spawn(storage_supervisor::run(state, || async {
                Ok::<_, StorageError>(Arc::new(MemoryStore::new()) as Arc<dyn Store>)
            }));
        }
        StorageBackend::Mongo => {
            #[cfg(feature = "mongo-store")]
            {
                use duum_back::dao::store::mongodb::{MongoConfig, MongoStore};

                let uri = state.config().mongo_uri.clone();
                let db_name = state.config().mongo_db.clone();
                info!(uri = %uri, "using MongoDB storage");
                tokio::spawn(storage_supervisor::run(state, move || {
                    let uri = uri.clone();
                    let db_name = db_name.clone();
                    async move {
                        let config = MongoConfig::from_uri(&uri, db_name.as_deref()).await?;
                        let store = MongoStore::connect(config).await?;
                        Ok::<_, StorageError>(Arc::new(store) as Arc<dyn Store>)
                    }
                }));
            }
            #[cfg(not(feature = "mongo-store"))]
            anyhow::bail!("MongoDB storage requested but the `mongo-store` feature is disabled");
        }
    }
    Ok(())
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
