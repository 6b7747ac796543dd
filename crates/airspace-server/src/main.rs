//! Airspace Server - event ingestion and conflict alerting for airport traffic

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use airspace_server::alerts::{alert_channel, sink_from_config};
use airspace_server::config::Config;
use airspace_server::fixtures::load_fixtures;
use airspace_server::loops::alert_loop::run_alert_loop;
use airspace_server::state::AppState;
use airspace_server::api;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("airspace_server=debug".parse()?);
    if config.log_json {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(filter)
            .init();
    }

    tracing::info!("Starting Airspace Server...");

    let (alerts, queue) = alert_channel(config.alert_queue_capacity);
    let state = Arc::new(AppState::new(config.clone(), alerts));

    if let Some(dir) = &config.fixture_dir {
        let report = load_fixtures(&state, dir)?;
        tracing::info!("Fixtures loaded: {} row(s)", report.total());
    }

    // Start the alert worker
    let sink = sink_from_config(&config)?;
    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let alert_handle = tokio::spawn(run_alert_loop(
        queue,
        sink,
        config.team_id.clone(),
        shutdown_tx.subscribe(),
    ));

    // Build the app
    let app = api::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Run server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", err);
            }
            tracing::info!("Shutdown requested");
        })
        .await?;

    let _ = shutdown_tx.send(());
    if let Err(err) = alert_handle.await {
        tracing::error!("Alert loop panicked: {}", err);
    }

    Ok(())
}
