use clap::Parser;
use statuswatch::{
    actors::{messages::CycleEvent, monitor::MonitorHandle},
    config::read_config_file,
    incidents::Transition,
    reconciler::Reconciler,
};
use tokio::sync::broadcast;
use tracing::{debug, info, level_filters::LevelFilter, trace, warn};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file (JSON, or TOML with a .toml extension)
    #[arg(short)]
    file: String,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,
}

fn init() {
    let filter = filter::Targets::new().with_targets(vec![
        ("statuswatch", LevelFilter::DEBUG),
        ("statuswatch_monitor", LevelFilter::TRACE),
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

    let config = read_config_file(&args.file)?;
    let reconciler = Reconciler::from_config(&config)?;

    if args.once {
        let report = reconciler.run_cycle().await?;
        log_event(&CycleEvent::from(&report));
        info!("wrote {}", config.snapshot.path.display());
        return Ok(());
    }

    debug!(
        "monitoring {} targets every {}s",
        config.targets.len(),
        config.monitor.interval
    );

    let (event_tx, event_rx) = broadcast::channel(16);
    let handle = MonitorHandle::spawn(reconciler, config.monitor.interval(), event_tx);
    tokio::spawn(log_events(event_rx));

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    handle.shutdown().await;

    Ok(())
}

async fn log_events(mut event_rx: broadcast::Receiver<CycleEvent>) {
    loop {
        match event_rx.recv().await {
            Ok(event) => log_event(&event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("skipped {skipped} cycle events");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn log_event(event: &CycleEvent) {
    for change in &event.changes {
        match change.transition {
            Transition::Opened => warn!("{}: incident {} opened", change.target_id, change.incident_id),
            Transition::Resolved => info!("{}: incident {} resolved", change.target_id, change.incident_id),
            Transition::Unchanged => {}
        }
    }

    info!(
        "cycle {} done: {} targets, {} open incidents",
        event.updated_at.to_rfc3339(),
        event.tiers.len(),
        event.open_incidents
    );
}
