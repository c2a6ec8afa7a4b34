//! Periodic Timer Driver
//!
//! Hosted stand-in for a hardware periodic timer. A driver task sleeps for
//! the configured period and delivers tick events through a registered
//! callback while the timer is enabled. Disabling bumps the timer epoch:
//! a tick already sitting in the event channel carries the old epoch and is
//! discarded at dispatch, which models "disable and clear pending" without
//! a race between the driver and the control loop.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::debug;

struct TimerShared {
    enabled: AtomicBool,
    epoch: AtomicU64,
    notify: Notify,
}

/// Handle controlling a spawned periodic timer
pub struct TimerHandle {
    shared: Arc<TimerShared>,
    task: JoinHandle<()>,
    label: &'static str,
}

impl TimerHandle {
    /// Enable the timer. Idempotent: enabling a running timer neither
    /// restarts its period nor clears anything.
    pub fn enable(&self) {
        if !self.shared.enabled.swap(true, Ordering::AcqRel) {
            debug!(timer = self.label, "timer enabled");
            self.shared.notify.notify_one();
        }
    }

    /// Disable the timer and clear any pending tick (epoch bump)
    pub fn disable(&self) {
        self.shared.epoch.fetch_add(1, Ordering::AcqRel);
        if self.shared.enabled.swap(false, Ordering::AcqRel) {
            debug!(timer = self.label, "timer disabled");
        }
        self.shared.notify.notify_one();
    }

    /// Whether the timer is currently enabled
    pub fn is_enabled(&self) -> bool {
        self.shared.enabled.load(Ordering::Acquire)
    }

    /// Current epoch; ticks from earlier epochs are stale
    pub fn epoch(&self) -> u64 {
        self.shared.epoch.load(Ordering::Acquire)
    }

    /// Whether a tick carrying `epoch` is still valid
    pub fn accepts(&self, epoch: u64) -> bool {
        self.is_enabled() && self.epoch() == epoch
    }

    /// Stop the driver task
    pub fn shutdown(&self) {
        self.task.abort();
    }
}

/// Spawn a periodic timer driver.
///
/// `make_tick` is the registered callback: it builds the event delivered on
/// each expiry, carrying the epoch the tick was produced under. The timer
/// starts disabled; enabling starts a fresh period.
pub fn spawn_periodic<E, F>(
    label: &'static str,
    period: Duration,
    events: UnboundedSender<E>,
    make_tick: F,
) -> TimerHandle
where
    E: Send + 'static,
    F: Fn(u64) -> E + Send + 'static,
{
    let shared = Arc::new(TimerShared {
        enabled: AtomicBool::new(false),
        epoch: AtomicU64::new(0),
        notify: Notify::new(),
    });

    let driver = Arc::clone(&shared);
    let task = tokio::spawn(async move {
        loop {
            // Park until enabled.
            while !driver.enabled.load(Ordering::Acquire) {
                driver.notify.notified().await;
            }

            let epoch = driver.epoch.load(Ordering::Acquire);
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(period) => {
                        if !driver.enabled.load(Ordering::Acquire)
                            || driver.epoch.load(Ordering::Acquire) != epoch
                        {
                            break;
                        }
                        if events.send(make_tick(epoch)).is_err() {
                            return;
                        }
                    }
                    _ = driver.notify.notified() => {
                        if !driver.enabled.load(Ordering::Acquire)
                            || driver.epoch.load(Ordering::Acquire) != epoch
                        {
                            break;
                        }
                    }
                }
            }
        }
    });

    TimerHandle {
        shared,
        task,
        label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[derive(Debug, PartialEq)]
    struct Tick(u64);

    #[tokio::test(start_paused = true)]
    async fn test_disabled_timer_stays_silent() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = spawn_periodic("test", Duration::from_millis(100), tx, Tick);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(rx.try_recv().is_err());
        timer.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_enabled_timer_ticks_periodically() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = spawn_periodic("test", Duration::from_millis(100), tx, Tick);

        timer.enable();
        tokio::time::sleep(Duration::from_millis(350)).await;

        let mut ticks = Vec::new();
        while let Ok(tick) = rx.try_recv() {
            ticks.push(tick);
        }
        assert_eq!(ticks, vec![Tick(0), Tick(0), Tick(0)]);
        timer.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_disable_bumps_epoch_and_stops_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = spawn_periodic("test", Duration::from_millis(100), tx, Tick);

        timer.enable();
        tokio::time::sleep(Duration::from_millis(150)).await;
        timer.disable();

        assert!(!timer.accepts(0));
        assert_eq!(timer.epoch(), 1);

        tokio::time::sleep(Duration::from_millis(500)).await;
        let mut ticks = 0;
        while rx.try_recv().is_ok() {
            ticks += 1;
        }
        assert_eq!(ticks, 1);
        timer.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reenable_starts_fresh_epoch_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = spawn_periodic("test", Duration::from_millis(100), tx, Tick);

        timer.enable();
        timer.disable();
        timer.enable();
        assert!(timer.is_enabled());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(rx.try_recv().unwrap(), Tick(1));
        assert!(timer.accepts(1));
        timer.shutdown();
    }
}
