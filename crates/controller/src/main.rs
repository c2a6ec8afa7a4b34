//! Digit Sequencer - Main Entry Point

use anyhow::Context;
use byte_queue::RxQueue;
use controller::{init_logging, AppConfig, Event, Runtime};
use hardware_io::{open_transport, spawn_receive_pump, LogIndicator};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Digit Sequencer v{} ===", env!("CARGO_PKG_VERSION"));

    let cfg = AppConfig::load().context("loading configuration")?;
    let (reader, tx) = open_transport(&cfg.serial).context("opening serial transport")?;

    let queue = Arc::new(RxQueue::new(cfg.queue_capacity));
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let _pump = spawn_receive_pump(reader, Arc::clone(&queue), events_tx.clone(), || {
        Event::RxWakeup
    });

    #[cfg(unix)]
    let _button = hardware_io::spawn_button_source(events_tx.clone(), || Event::ButtonPress)
        .context("installing button edge listener")?;

    let _watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            let _ = shutdown_tx.send(true);
        }
    });

    let mut runtime = Runtime::new(
        &cfg.timing,
        queue,
        &events_tx,
        events_rx,
        tx,
        Box::new(LogIndicator::new()),
        shutdown_rx,
    );
    runtime.run().await?;

    info!("digit sequencer stopped");
    Ok(())
}
