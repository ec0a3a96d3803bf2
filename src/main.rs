use std::sync::Arc;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use vectus::config::AppConfig;
use vectus::handlers;
use vectus::services::ai::openai::OpenAiProvider;
use vectus::services::ai::LlmProvider;
use vectus::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let llm: Option<Box<dyn LlmProvider>> = match &config.openai_api_key {
        Some(key) => {
            tracing::info!(
                "using OpenAI responder (model: {}, timeout: {}s) with rule-based fallback",
                config.openai_model,
                config.llm_timeout_secs
            );
            Some(Box::new(OpenAiProvider::with_base_url(
                key.clone(),
                config.openai_model.clone(),
                config.openai_base_url.clone(),
            )))
        }
        None => {
            tracing::info!("no OpenAI API key found, using rule-based responder");
            None
        }
    };

    let static_dir = config.static_dir.clone();
    let port = config.port;
    let state = Arc::new(AppState::new(config, llm));

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/message", post(handlers::message::post_message))
        .fallback_service(ServeDir::new(&static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| {
            format!("failed to bind {addr}; port {port} may already be in use, try a different PORT")
        })?;

    tracing::info!("Vectus AI running on port {port}");
    axum::serve(listener, app).await?;

    Ok(())
}
