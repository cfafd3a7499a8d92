use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use statuswatch::{
    api::{ApiConfig, ApiState, spawn_api_server},
    snapshot::file::FileSnapshotStore,
    util::{get_addr, get_port, get_snapshot_path},
};
use tracing::{info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Snapshot written by the monitor (defaults to STATUS_PATH or ./status.json)
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Disable CORS headers
    #[arg(long)]
    no_cors: bool,
}

fn init() {
    let filter = filter::Targets::new().with_targets(vec![
        ("statuswatch", LevelFilter::DEBUG),
        ("statuswatch_api", LevelFilter::TRACE),
        ("tower_http", LevelFilter::DEBUG),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let snapshot_path = args.snapshot.unwrap_or_else(get_snapshot_path);
    let store = FileSnapshotStore::new(&snapshot_path);

    let config = ApiConfig {
        bind_addr: SocketAddr::from((get_addr(), get_port())),
        enable_cors: !args.no_cors,
    };

    let addr = spawn_api_server(config, ApiState::new(Arc::new(store))).await?;
    info!("serving {} on http://{addr}", snapshot_path.display());

    tokio::signal::ctrl_c().await?;
    info!("shutting down");

    Ok(())
}
