mod application;
mod domain;
mod infrastructure;

use anyhow::Context;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use application::shrink_service::ShrinkService;
use infrastructure::axum_handler::{create_router, AppState};
use infrastructure::config::AppConfig;
use infrastructure::image_codec::DefaultImageCodec;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pixel_shrink=info,tower_http=info")),
        )
        .with_target(false)
        .init();

    info!("Starting PixelShrink v{}", env!("CARGO_PKG_VERSION"));

    let config_path = AppConfig::default_path();
    let config = match AppConfig::load(Path::new(&config_path))
        .with_context(|| format!("failed to load configuration from {}", config_path))?
    {
        Some(config) => {
            info!("Configuration loaded from {}", config_path);
            config
        }
        None => {
            info!("No configuration at {}, using defaults", config_path);
            AppConfig::default()
        }
    };

    let codec = Arc::new(DefaultImageCodec::new());
    let shrink_service = Arc::new(ShrinkService::new(
        codec.clone(),
        codec,
        config.upload.allowed_extensions.clone(),
    ));
    let state = Arc::new(AppState {
        shrink_service,
        encode_defaults: config.encode.clone(),
    });
    let app = create_router(state, config.upload.max_content_length);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("invalid bind address {}", config.bind_address()))?;
    info!("Listening on http://{}", addr);

    // サーバーの開始
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
