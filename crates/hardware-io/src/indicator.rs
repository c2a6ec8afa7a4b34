//! Indicator Output
//!
//! One digital output driven by the control core: forced on/off or toggled.

use tracing::debug;

/// Digital indicator output capability
pub trait Indicator: Send {
    /// Force the indicator to a state
    fn set(&mut self, on: bool);

    /// Flip the indicator state
    fn toggle(&mut self);

    /// Current state
    fn is_on(&self) -> bool;
}

/// Host indicator that reports state changes through the log stream
pub struct LogIndicator {
    on: bool,
}

impl LogIndicator {
    /// Create an indicator in the off state
    pub fn new() -> Self {
        Self { on: false }
    }
}

impl Default for LogIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for LogIndicator {
    fn set(&mut self, on: bool) {
        if self.on != on {
            self.on = on;
            debug!(on, "indicator set");
        }
    }

    fn toggle(&mut self) {
        self.on = !self.on;
        debug!(on = self.on, "indicator toggled");
    }

    fn is_on(&self) -> bool {
        self.on
    }
}
