//! Cageside Back binary entrypoint wiring the REST API to its storage backend.

use std::{env, net::SocketAddr};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cageside_back::{
    auth::TokenKeys,
    config::AppConfig,
    routes,
    state::{AppState, SharedState},
};

const JWT_SECRET_ENV: &str = "CAGESIDE_BACK_JWT_SECRET";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let token_keys = TokenKeys::from_secret(&jwt_secret());
    let app_state = AppState::new(config, token_keys);

    spawn_storage(app_state.clone());
    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Read the token-signing secret, falling back to a development-only value.
fn jwt_secret() -> Vec<u8> {
    match env::var(JWT_SECRET_ENV) {
        Ok(secret) if !secret.is_empty() => secret.into_bytes(),
        _ => {
            warn!(
                "{JWT_SECRET_ENV} is not set; using an insecure development secret. \
                 Issued tokens will not survive configuration changes."
            );
            b"cageside-dev-secret".to_vec()
        }
    }
}

/// Launch the MongoDB supervisor, or install the in-memory store when the
/// binary is built without a database backend.
#[cfg(feature = "mongo-store")]
fn spawn_storage(state: SharedState) {
    use std::sync::Arc;

    use cageside_back::dao::{
        pick_store::{PickStore, mongodb::{MongoConfig, MongoPickStore}},
        storage::StorageError,
    };
    use cageside_back::services::storage_supervisor;

    let uri = env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".into());
    let db_name = env::var("MONGO_DB").ok();

    tokio::spawn(storage_supervisor::run(state, move || {
        let uri = uri.clone();
        let db_name = db_name.clone();
        async move {
            let config = MongoConfig::from_uri(&uri, db_name.as_deref())
                .await
                .map_err(StorageError::from)?;
            let store = MongoPickStore::connect(config)
                .await
                .map_err(StorageError::from)?;
            Ok(Arc::new(store) as Arc<dyn PickStore>)
        }
    }));
}

#[cfg(not(feature = "mongo-store"))]
fn spawn_storage(state: SharedState) {
    use std::sync::Arc;

    use cageside_back::dao::pick_store::memory::MemoryPickStore;

    tokio::spawn(async move {
        warn!("built without a database backend; using the volatile in-memory store");
        state.set_pick_store(Arc::new(MemoryPickStore::new())).await;
    });
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
