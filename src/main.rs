use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use calendar_assistant::config::AppConfig;
use calendar_assistant::handlers;
use calendar_assistant::services;
use calendar_assistant::services::ai::gemini::GeminiProvider;
use calendar_assistant::services::calendar::google::{GoogleCalendarProvider, ServiceAccountKey};
use calendar_assistant::services::sessions::SessionStore;
use calendar_assistant::state::AppState;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;

    let key = ServiceAccountKey::from_file(&config.credentials_path)
        .context("Google Calendar credentials are required")?;
    let client = services::http_client(config.http_timeout)?;

    let calendar = GoogleCalendarProvider::new(config.calendar_id.clone(), key, client.clone())?;
    tracing::info!(calendar_id = %config.calendar_id, "using Google Calendar");

    let llm = GeminiProvider::new(
        config.google_api_key.clone(),
        config.gemini_model.clone(),
        client,
    );
    tracing::info!("using Gemini LLM provider (model: {})", config.gemini_model);

    let state = Arc::new(AppState {
        config: config.clone(),
        llm: Box::new(llm),
        calendar: Box::new(calendar),
        sessions: SessionStore::new(config.session_ttl),
    });

    if config.session_ttl.is_some() {
        let sweeper = Arc::clone(&state);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SESSION_SWEEP_INTERVAL);
            loop {
                ticker.tick().await;
                sweeper.sessions.evict_idle(Instant::now());
            }
        });
    }

    let app = handlers::router(Arc::clone(&state));

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!(sessions = state.sessions.len(), "server stopped, dropping sessions");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
