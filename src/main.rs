//! Registry-driven reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!   Service registry ──▶ reconciler ──▶ RouteStore (ArcSwap<RouteTable>)
//!   (k8s / http / file)     │                 │              │
//!                           │ every N secs    │ load()       │ load()
//!                           ▼                 ▼              ▼
//!                        metrics          director     domain admission
//!                                             │        (admin API / ACME)
//!     Client Request                          ▼
//!     ──────────▶ http server ──▶ host/path match ──▶ rewrite ──▶ Backend
//!                 (rustls opt.)                        (http://svc.ns:port)
//! ```

use clap::Parser;
use std::path::PathBuf;

use registry_proxy::config::load_config;
use registry_proxy::lifecycle::{signals, startup};
use registry_proxy::observability::logging;
use registry_proxy::Shutdown;

#[derive(Parser)]
#[command(name = "registry-proxy")]
#[command(about = "Reverse proxy routed by service registry annotations", long_about = None)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(&args.config)?;

    logging::init(&config.observability.log_level);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config.display(),
        bind_address = %config.listener.bind_address,
        source = ?config.registry.source,
        "registry-proxy starting"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    startup::run(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
