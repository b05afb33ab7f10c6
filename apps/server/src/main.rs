use anyhow::Context;
use iox::ArchiveProvider;
use lapline_provider_core::CachedProvider;
use lapline_server::{app, shutdown_on, AppState, ServerConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,lapline_server=debug")),
        )
        .init();

    let config = ServerConfig::load()?;
    let archive = ArchiveProvider::new(config.archive_root.clone());
    if !archive.root().is_dir() {
        warn!(archive = %archive.root().display(), "Archive directory does not exist yet");
    }

    let bind_addr = config.bind_addr.clone();
    info!(
        bind = %bind_addr,
        archive = %archive.root().display(),
        session = %config.default_session,
        stride = config.default_stride,
        "Starting lapline server"
    );

    let router = app(AppState::new(CachedProvider::new(archive), config));
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("bind {bind_addr}"))?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c()))
        .await?;
    Ok(())
}
