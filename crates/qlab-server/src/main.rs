//! QLab server binary entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qlab_server::{AppState, ServerConfig, create_router};

#[derive(Debug, Parser)]
#[command(name = "qlab-server", about = "QLab quantum-photonics simulation backend")]
struct Args {
    /// Address to bind.
    #[arg(long, env = "QLAB_BIND", default_value = "127.0.0.1:8000")]
    bind: SocketAddr,

    /// Per-script execution timeout in seconds.
    #[arg(long, env = "QLAB_EXEC_TIMEOUT_SECS", default_value_t = 5)]
    exec_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qlab_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = ServerConfig {
        bind_address: args.bind,
        exec_timeout: Duration::from_secs(args.exec_timeout_secs),
        ..ServerConfig::default()
    };
    let bind_addr = config.bind_address;

    let state = Arc::new(AppState::with_config(config));
    let app = create_router(state);

    tracing::info!("Starting QLab server at http://{}", bind_addr);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
