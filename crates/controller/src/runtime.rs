//! Control Loop Runtime
//!
//! Interprets the engine's effect reports against the hardware
//! capabilities. The loop suspends on the event channel, drains whatever is
//! pending, and dispatches in priority order; stale events (wrong phase,
//! bumped timer epoch, an already-drained queue) are discarded at dispatch
//! instead of being allowed to act late.

use crate::app_config::TimingSettings;
use crate::event::Event;
use crate::protocol;
use byte_queue::RxQueue;
use hardware_io::{spawn_periodic, Indicator, SerialTx, TimerHandle, TransportError};
use sequence_engine::{FeedResult, IndicatorAction, LineEditor, Phase, SequencerCore, TickOutcome};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWrite;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tracing::{debug, info};

/// Errors that stop the control loop
#[derive(Debug, Error)]
pub enum ControlError {
    /// Serial transmit failed
    #[error("serial transmit failed: {0}")]
    Transmit(#[from] TransportError),
}

/// The control loop and everything it owns
pub struct Runtime<W> {
    core: SequencerCore,
    editor: LineEditor,
    queue: Arc<RxQueue>,
    events: UnboundedReceiver<Event>,
    tx: SerialTx<W>,
    indicator: Box<dyn Indicator>,
    analysis_timer: TimerHandle,
    blink_timer: TimerHandle,
    shutdown: watch::Receiver<bool>,
    pending: Vec<Event>,
}

impl<W: AsyncWrite + Unpin> Runtime<W> {
    /// Build a runtime and spawn its two timer drivers
    pub fn new(
        timing: &TimingSettings,
        queue: Arc<RxQueue>,
        events_tx: &UnboundedSender<Event>,
        events: UnboundedReceiver<Event>,
        tx: SerialTx<W>,
        indicator: Box<dyn Indicator>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let analysis_timer = spawn_periodic(
            "analysis",
            Duration::from_millis(timing.analysis_period_ms),
            events_tx.clone(),
            |epoch| Event::AnalysisTick { epoch },
        );
        let blink_timer = spawn_periodic(
            "blink",
            Duration::from_millis(timing.blink_period_ms),
            events_tx.clone(),
            |epoch| Event::BlinkTick { epoch },
        );

        Self {
            core: SequencerCore::new(),
            editor: LineEditor::new(),
            queue,
            events,
            tx,
            indicator,
            analysis_timer,
            blink_timer,
            shutdown,
            pending: Vec::new(),
        }
    }

    /// Run until the event channel closes or shutdown is requested
    pub async fn run(&mut self) -> Result<(), ControlError> {
        self.indicator.set(false);
        self.tx.write_str("\r\n").await?;
        self.begin_input_cycle().await?;

        loop {
            let first = tokio::select! {
                _ = self.shutdown.changed() => break,
                event = self.events.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
            };

            self.pending.push(first);
            while let Ok(event) = self.events.try_recv() {
                self.pending.push(event);
            }
            // Stable sort: priority order across classes, arrival order
            // within one.
            self.pending.sort_by_key(Event::priority);

            let batch: Vec<Event> = self.pending.drain(..).collect();
            for event in batch {
                self.dispatch(event).await?;
            }
        }

        info!("control loop stopping");
        self.analysis_timer.disable();
        self.blink_timer.disable();
        self.indicator.set(false);
        self.analysis_timer.shutdown();
        self.blink_timer.shutdown();
        Ok(())
    }

    async fn dispatch(&mut self, event: Event) -> Result<(), ControlError> {
        match event {
            Event::ButtonPress => self.on_button().await,
            Event::RxWakeup => self.on_rx_wakeup().await,
            Event::AnalysisTick { epoch } => self.on_analysis_tick(epoch).await,
            Event::BlinkTick { epoch } => {
                self.on_blink_tick(epoch);
                Ok(())
            }
        }
    }

    /// Button edge: count always; freeze only during analysis.
    async fn on_button(&mut self) -> Result<(), ControlError> {
        if self.core.phase() == Phase::Analysis {
            // Suppression must land before any queued blink toggle applies.
            self.blink_timer.disable();
        }
        let report = self.core.button_press();
        info!(count = report.count, froze = ?report.froze, "button edge");
        self.tx.write_line(&protocol::button_line(report.count)).await?;
        Ok(())
    }

    /// Queue activity: feed the editor during input, abort analysis otherwise.
    async fn on_rx_wakeup(&mut self) -> Result<(), ControlError> {
        if self.queue.is_empty() {
            // The queue was drained by an earlier wakeup in this batch.
            return Ok(());
        }
        match self.core.phase() {
            Phase::Input => self.drain_input().await,
            Phase::Analysis => self.interrupt_analysis().await,
        }
    }

    /// Analysis timer expiry: classify one digit, or end the phase.
    async fn on_analysis_tick(&mut self, epoch: u64) -> Result<(), ControlError> {
        if !self.analysis_timer.accepts(epoch) || self.core.phase() != Phase::Analysis {
            return Ok(());
        }
        if !self.queue.is_empty() {
            // New input wins over the classification this tick would do.
            return self.interrupt_analysis().await;
        }

        match self.core.analysis_tick() {
            TickOutcome::Idle => Ok(()),
            TickOutcome::Finished => self.complete_analysis().await,
            TickOutcome::Classified(report) => {
                match report.action {
                    Some(IndicatorAction::ToggleOnce) => {
                        // Clear pending blink, stop it, then the one-shot.
                        self.blink_timer.disable();
                        self.indicator.toggle();
                    }
                    Some(IndicatorAction::StartBlink) => self.blink_timer.enable(),
                    None => {}
                }
                self.tx.write_line(&protocol::digit_status(&report)).await?;
                if report.finished {
                    self.complete_analysis().await?;
                }
                Ok(())
            }
        }
    }

    /// Blink timer expiry: toggle while enabled, ignore stale ticks.
    fn on_blink_tick(&mut self, epoch: u64) {
        if !self.blink_timer.accepts(epoch) || self.core.phase() != Phase::Analysis {
            return;
        }
        self.indicator.toggle();
    }

    /// Analysis ran off the end of the line
    async fn complete_analysis(&mut self) -> Result<(), ControlError> {
        debug!("sequence fully analyzed");
        self.tx.write_line(protocol::COMPLETION).await?;
        self.leave_analysis().await
    }

    /// New input preempted analysis
    async fn interrupt_analysis(&mut self) -> Result<(), ControlError> {
        debug!("analysis preempted by new input");
        self.tx.write_line(protocol::INTERRUPTED_ELLIPSIS).await?;
        self.tx.write_line(protocol::INTERRUPTED).await?;
        self.leave_analysis().await
    }

    /// Common analysis exit: timers off, indicator off, flags cleared.
    async fn leave_analysis(&mut self) -> Result<(), ControlError> {
        self.analysis_timer.disable();
        self.blink_timer.disable();
        self.indicator.set(false);
        self.core.exit_analysis();
        self.begin_input_cycle().await
    }

    /// Prompt, then consume whatever already sits in the queue
    async fn begin_input_cycle(&mut self) -> Result<(), ControlError> {
        self.tx.write_str(protocol::PROMPT).await?;
        self.drain_input().await
    }

    /// Feed queued bytes to the editor until it completes a line or the
    /// queue runs dry.
    async fn drain_input(&mut self) -> Result<(), ControlError> {
        while let Some(byte) = self.queue.pop() {
            match self.editor.feed(byte) {
                FeedResult::Ignored => {}
                FeedResult::Echo(echo) => self.tx.write_byte(echo).await?,
                FeedResult::Completed { echo, overflow } => {
                    self.tx.write_byte(echo).await?;
                    self.tx.write_str("\r\n").await?;
                    if overflow {
                        self.tx.write_line(protocol::OVERFLOW_WARNING).await?;
                    }

                    let line = self.editor.take_line();
                    debug!(len = line.len(), overflow, "line completed");

                    if self.core.begin_analysis(line) {
                        self.analysis_timer.enable();
                        // Any byte still queued aborts the fresh analysis
                        // at its first tick; leave it where it is.
                        break;
                    }
                    // Empty line: nothing to analyze, start over.
                    self.tx.write_line(protocol::COMPLETION).await?;
                    self.tx.write_str(protocol::PROMPT).await?;
                }
            }
        }
        Ok(())
    }
}
