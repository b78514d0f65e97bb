mod api;
mod bot;
mod metrics;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clipstitch_core::{
    load_config, validate_config, CommandRunner, FfmpegRunner, IntakeController, MergePipeline,
    SessionStore, TelegramClient, WatermarkSpec,
};

use api::create_router;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("clipstitch {} starting", VERSION);

    // Determine config path
    let config_path = std::env::var("CLIPSTITCH_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load and validate configuration. A missing bot token aborts here,
    // before any task runs.
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;
    info!("Configuration loaded");
    info!("Work directory: {:?}", config.pipeline.work_dir);

    // Telegram client
    let transport = Arc::new(TelegramClient::new(config.telegram.clone()));
    match transport.get_me().await {
        Ok(me) => info!(
            "Authenticated as @{}",
            me.username.as_deref().unwrap_or("<unnamed>")
        ),
        Err(e) => warn!("Could not verify bot identity yet: {}", e),
    }

    // Merge pipeline
    let runner = Arc::new(FfmpegRunner::new(config.runner.clone()));
    if let Err(e) = runner.validate().await {
        warn!("ffmpeg validation failed: {}", e);
    }
    let pipeline = MergePipeline::new(
        config.pipeline.clone(),
        Arc::clone(&runner),
        WatermarkSpec::default(),
    );

    // Intake controller over the session store
    let store = Arc::new(SessionStore::new());
    let controller = Arc::new(IntakeController::new(
        store,
        pipeline,
        Arc::clone(&transport),
    ));

    // Update polling loop
    let poller = tokio::spawn(bot::run_polling(transport, controller));
    info!("Update poller started");

    // Liveness server
    let app = create_router();
    let addr = SocketAddr::new(config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Liveness server listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    poller.abort();
    let _ = poller.await;
    info!("Update poller stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
