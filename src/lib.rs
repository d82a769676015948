//! A small polls site: an index of the latest questions, a detail page per
//! question, and placeholder results/vote endpoints.
use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use axum_server::Handle;
use tokio::signal;
use tracing::{info, warn};

pub mod config;
pub mod db;
pub mod error;
pub mod fixtures;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod shortcuts;
pub mod store;
pub mod templates;

use config::Config;
use error::StartupError;
use store::{MemoryQuestionStore, PgQuestionStore, QuestionStore};
use templates::Templates;

/// Shared by every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn QuestionStore>,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn new(store: Arc<dyn QuestionStore>, templates: Templates) -> Self {
        Self {
            store,
            templates: Arc::new(templates),
        }
    }

    /// Connects the store and loads templates and fixtures as configured.
    pub async fn from_config(config: &Config) -> Result<Self, StartupError> {
        let store: Arc<dyn QuestionStore> = match &config.database_url {
            Some(url) => {
                let pool = db::create_pool(url, config.max_connections).await?;
                db::migrate(&pool).await?;
                Arc::new(PgQuestionStore::new(pool))
            }
            None => Arc::new(MemoryQuestionStore::new()),
        };

        let templates = match &config.template_dir {
            Some(dir) => Templates::from_dir(dir)?,
            None => Templates::builtin()?,
        };

        if let Some(path) = &config.fixtures {
            fixtures::load(store.as_ref(), path).await?;
        }

        Ok(Self::new(store, templates))
    }
}

pub fn app(state: AppState) -> Router {
    routes::create_routes(state)
}

pub async fn run(config: Config) -> Result<(), StartupError> {
    info!("Initializing state...");
    let state = AppState::from_config(&config).await?;

    let address = SocketAddr::new(config.host, config.port);
    let handle = Handle::new();
    tokio::spawn(shutdown_signal(handle.clone()));

    info!("Server running on {address}");
    axum_server::bind(address)
        .handle(handle)
        .serve(app(state).into_make_service())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal(handle: Handle) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
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

    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}
