//! scandock server binary.
//!
//! Single network listener per deployment: REST endpoints for the capture
//! client, a WebSocket feed for viewer clients, and the mobile entry-URL
//! endpoint for the QR collaborator. Sessions are held in memory unless a
//! data directory is configured.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use scandock_core::session::{DEFAULT_IMAGE_CAP, SessionStore};
use scandock_sync::{DirSessionStore, InProcessChannel, MemorySessionStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod net;
mod routes;
mod ws;

use routes::AppState;

#[derive(Parser)]
#[command(name = "scandock-server")]
#[command(about = "Scandock - session-scoped image sync server", long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Directory for persistent session storage; in-memory when unset
    #[arg(long, env = "DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Maximum images retained per session (0 disables eviction)
    #[arg(long, default_value_t = DEFAULT_IMAGE_CAP)]
    image_cap: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let image_cap = (args.image_cap > 0).then_some(args.image_cap);

    let store: Arc<dyn SessionStore> = match &args.data_dir {
        Some(dir) => {
            info!("persisting sessions under {}", dir.display());
            Arc::new(DirSessionStore::new(dir, image_cap).await?)
        }
        None => Arc::new(MemorySessionStore::with_cap(image_cap)),
    };

    let state = AppState {
        channel: Arc::new(InProcessChannel::new(store)),
        port: args.port,
    };
    let app = routes::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://localhost:{}", args.port);
    if let Some(ip) = net::local_ip() {
        info!("phones on the same network: http://{}:{}", ip, args.port);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down");
}
