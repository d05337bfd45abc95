//! Application startup and lifecycle management.
//!
//! Startup is all-or-nothing: the API key, the verse table and the listener
//! must all be ready before the router serves its first request.

use crate::config::{DatasetConfig, TafsirConfig};
use crate::handlers;
use crate::services::providers::groq::{GroqCommentaryProvider, GroqConfig};
use crate::services::providers::CommentaryProvider;
use crate::services::VerseStore;
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{request_id_middleware, request_span},
};
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state. Everything in here is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub verses: Arc<VerseStore>,
    pub commentary: Arc<dyn CommentaryProvider>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/tafsir", post(handlers::get_tafsir))
        .route("/verses/:verse_key", get(handlers::get_verse))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(request_span::<axum::body::Body>))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Load the verse table, turning any failure into a fatal configuration error.
pub fn load_verses(dataset: &DatasetConfig) -> Result<VerseStore, AppError> {
    let verses = VerseStore::load(&dataset.path, &dataset.key_column, &dataset.text_column)
        .map_err(|e| {
            tracing::error!(
                path = %dataset.path.display(),
                error = %e,
                "Failed to load verse dataset"
            );
            AppError::ConfigError(anyhow::Error::new(e))
        })?;

    tracing::info!(
        path = %dataset.path.display(),
        verses = verses.len(),
        "Loaded verse dataset"
    );

    Ok(verses)
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    /// Build the application with the Groq provider described by `config`.
    pub async fn build(config: TafsirConfig) -> Result<Self, AppError> {
        let groq_config = GroqConfig {
            api_key: config.llm.api_key.clone(),
            model: config.llm.model.clone(),
            base_url: config.llm.base_url.clone(),
            timeout: config.llm.timeout,
        };
        let provider = GroqCommentaryProvider::new(groq_config).map_err(|e| {
            tracing::error!("Failed to initialize Groq provider: {}", e);
            AppError::ConfigError(anyhow::Error::new(e))
        })?;

        tracing::info!(
            model = %config.llm.model,
            "Initialized Groq commentary provider"
        );

        Self::build_with_provider(config, Arc::new(provider)).await
    }

    /// Build the application around an already constructed provider.
    pub async fn build_with_provider(
        config: TafsirConfig,
        commentary: Arc<dyn CommentaryProvider>,
    ) -> Result<Self, AppError> {
        let verses = Arc::new(load_verses(&config.dataset)?);

        let state = AppState {
            verses,
            commentary,
        };

        // Port 0 picks a random port, used by tests
        let addr = config.common.bind_address();
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, build_router(state.clone()))
            .with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn verses_loaded(&self) -> usize {
        self.state.verses.len()
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
