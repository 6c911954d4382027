//! Matchday Back binary entrypoint wiring REST, SSE, push dispatch and the
//! in-memory record store.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod dao;
mod dto;
mod error;
mod notify;
mod pubsub;
mod routes;
mod services;
mod state;

use config::AppConfig;
use dao::match_store::memory::MemoryStore;
use notify::{DisabledPushProvider, PushProvider, fcm::FcmClient};
use services::push_service;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();

    let provider = build_push_provider(&config);
    let (dispatcher, queue) = push_service::channel(config.push_queue_capacity);
    let app_state = AppState::new(dispatcher, config.live_channel_capacity);

    app_state.install_match_store(Arc::new(MemoryStore::new())).await;
    // The in-process hub doubles as the default live transport; a
    // broker-backed transport installs into the same slot.
    app_state.install_transport(app_state.hub()).await;

    // Dispatch outlives any request: the worker drains the queue until the
    // server shuts down.
    tokio::spawn(push_service::run_dispatcher(
        app_state.clone(),
        queue,
        provider,
    ));

    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Build the configured push provider, degrading to the disabled provider
/// when credentials are absent or unreadable.
fn build_push_provider(config: &AppConfig) -> Arc<dyn PushProvider> {
    let Some(path) = config.push_credentials_path.as_deref() else {
        return Arc::new(DisabledPushProvider);
    };

    match FcmClient::from_credentials_file(path) {
        Ok(client) => {
            info!(project_id = client.project_id(), "push provider ready");
            Arc::new(client)
        }
        Err(err) => {
            warn!(error = %err, "failed to load push credentials; push disabled");
            Arc::new(DisabledPushProvider)
        }
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: state::SharedState) -> Router<()> {
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
