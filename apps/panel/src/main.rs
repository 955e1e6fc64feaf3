//! mediadrop panel entry point.
//!
//! Usage: `mediadrop-panel <file.svg>...`

mod app;
mod config;
mod reporter;

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mediadrop=debug")),
        )
        .init();

    let config = config::PanelConfig::load()?;
    tracing::info!(control_base = %config.control_base, "configuration loaded");

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();

    // Uploads are strictly sequential; a single-threaded runtime is enough.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(app::run(config, paths))
}
