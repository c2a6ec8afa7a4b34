//! Button Edge Source
//!
//! The physical button of the original hardware maps to SIGUSR1 on the
//! host: `kill -USR1 <pid>` is one falling edge. Each edge is delivered to
//! the control loop through the registered callback, where it outranks
//! every other pending event.

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

/// Spawn the button edge listener.
///
/// `make_edge` builds the event delivered on each edge.
pub fn spawn_button_source<E, F>(
    events: UnboundedSender<E>,
    make_edge: F,
) -> std::io::Result<JoinHandle<()>>
where
    E: Send + 'static,
    F: Fn() -> E + Send + 'static,
{
    let mut edges = signal(SignalKind::user_defined1())?;
    Ok(tokio::spawn(async move {
        while edges.recv().await.is_some() {
            debug!("button edge (SIGUSR1)");
            if events.send(make_edge()).is_err() {
                break;
            }
        }
    }))
}
