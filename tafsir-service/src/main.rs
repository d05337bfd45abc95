use service_core::observability::init_tracing;
use tafsir_service::config::{TafsirConfig, TracingSettings};
use tafsir_service::services::init_metrics;
use tafsir_service::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Reads .env before anything looks at the environment
    let tracing_settings = TracingSettings::load();
    init_tracing(
        "tafsir-service",
        &tracing_settings.log_level,
        tracing_settings.otlp_endpoint.as_deref(),
    );

    let config = TafsirConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_metrics().map_err(|e| {
        tracing::error!("Failed to initialize metrics: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start tafsir-service: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    tracing::info!(
        port = app.port(),
        verses = app.verses_loaded(),
        "tafsir-service ready"
    );

    app.run_until_stopped().await
}
