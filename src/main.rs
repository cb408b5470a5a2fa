//! Expert Desk - ask a physical therapist or a nutritionist
//!
//! A small web service that screens health questions for relevance and
//! answers them in the voice of the selected expert, keeping a per-session
//! transcript.

mod api;
mod composer;
mod history;
mod llm;
mod persona;
mod relevance;
mod runtime;
mod session;
mod state_machine;

use api::{create_router, AppState};
use llm::LlmConfig;
use chrono::TimeDelta;
use runtime::{spawn_reaper, SessionManager, TurnController, DEFAULT_IDLE_TTL_SECS};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 8000;
const REAP_INTERVAL: Duration = Duration::from_secs(60);

/// Parse an env var, falling back to `default` when unset or malformed
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine; the process environment still applies
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expert_desk=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    if let Ok(path) = &dotenv {
        tracing::info!(path = %path.display(), "Loaded environment file");
    }

    // Configuration
    let port: u16 = env_or("EXPERT_DESK_PORT", DEFAULT_PORT);
    let idle_ttl = TimeDelta::try_seconds(env_or(
        "EXPERT_DESK_SESSION_IDLE_SECS",
        DEFAULT_IDLE_TTL_SECS,
    ))
    .filter(|ttl| *ttl > TimeDelta::zero())
    .unwrap_or_else(|| {
        tracing::warn!("EXPERT_DESK_SESSION_IDLE_SECS out of range; using default");
        TimeDelta::seconds(DEFAULT_IDLE_TTL_SECS)
    });

    let llm_config = LlmConfig::from_env();
    if llm_config.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; every question will fail until it is");
    }
    tracing::info!(
        model = %llm_config.model,
        base_url = %llm_config.base_url,
        temperature = llm_config.temperature,
        "Completion service configured"
    );

    let llm = llm::build_service(&llm_config)?;
    let controller = TurnController::new(llm, llm_config.temperature);
    let sessions = Arc::new(SessionManager::new(controller).with_idle_ttl(idle_ttl));
    spawn_reaper(&sessions, REAP_INTERVAL);
    let state = AppState::new(sessions);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Expert desk listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
