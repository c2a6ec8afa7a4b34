//! Receive Pump
//!
//! Bridges the transport's receive half to the control loop: the hosted
//! stand-in for the receive interrupt. Each byte is filtered to 7-bit
//! ASCII, pushed into the shared queue, and announced on the event channel
//! so the control loop wakes up.

use byte_queue::RxQueue;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Spawn the receive pump task.
///
/// `wake` builds the event announcing new queue activity; the pump never
/// blocks on the queue. A full queue drops the byte, which is the
/// documented saturation policy.
pub fn spawn_receive_pump<R, E, F>(
    mut reader: R,
    queue: Arc<RxQueue>,
    events: UnboundedSender<E>,
    wake: F,
) -> JoinHandle<()>
where
    R: AsyncRead + Send + Unpin + 'static,
    E: Send + 'static,
    F: Fn() -> E + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = [0u8; 1];
        loop {
            match reader.read(&mut buf).await {
                Ok(0) => {
                    debug!("receive stream closed");
                    break;
                }
                Ok(_) => {
                    let byte = buf[0];
                    if byte > 0x7F {
                        continue;
                    }
                    if !queue.push(byte) {
                        warn!(
                            byte,
                            total_dropped = queue.dropped(),
                            "receive queue full, dropping byte"
                        );
                    }
                    if events.send(wake()).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("receive read failed: {e}");
                    break;
                }
            }
        }
    })
}
