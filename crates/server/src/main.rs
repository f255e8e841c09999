//! Shopping assistant server binary

use std::time::Duration;

use tracing_subscriber::EnvFilter;

use shop_agent_config::load_settings;
use shop_agent_server::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).or_else(|| {
        std::env::var("SHOP_AGENT_CONFIG").ok()
    });
    let settings = load_settings(config_path.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone())),
        )
        .init();

    let state = AppState::from_settings(settings)?;
    spawn_eviction_task(&state);

    let addr = format!(
        "{}:{}",
        state.settings.server.host, state.settings.server.port
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Listening");

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

/// Periodic sweep of idle sessions
fn spawn_eviction_task(state: &AppState) {
    let agent = state.agent.clone();
    let max_idle = Duration::from_secs(state.settings.session.max_idle_seconds);
    let interval = Duration::from_secs(state.settings.session.eviction_interval_seconds);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let evicted = agent.sessions().evict_idle(max_idle);
            if evicted > 0 {
                tracing::info!(evicted, "Idle sessions evicted");
            }
        }
    });
}
