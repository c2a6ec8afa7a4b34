//! Simulated Hardware Doubles

use crate::indicator::Indicator;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct SimState {
    on: bool,
    /// State after every set/toggle call, in order
    history: Vec<bool>,
}

/// Simulated indicator recording every transition for assertions
pub struct SimIndicator {
    state: Arc<Mutex<SimState>>,
}

impl SimIndicator {
    /// Create a simulated indicator in the off state
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState::default())),
        }
    }

    /// Probe handle that stays valid after the indicator moves into the runtime
    pub fn probe(&self) -> IndicatorProbe {
        IndicatorProbe {
            state: Arc::clone(&self.state),
        }
    }
}

impl Default for SimIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for SimIndicator {
    fn set(&mut self, on: bool) {
        let mut state = self.state.lock().unwrap();
        state.on = on;
        state.history.push(on);
    }

    fn toggle(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.on = !state.on;
        let on = state.on;
        state.history.push(on);
    }

    fn is_on(&self) -> bool {
        self.state.lock().unwrap().on
    }
}

/// Read side of a [`SimIndicator`]
pub struct IndicatorProbe {
    state: Arc<Mutex<SimState>>,
}

impl IndicatorProbe {
    /// Current indicator state
    pub fn is_on(&self) -> bool {
        self.state.lock().unwrap().on
    }

    /// State after every set/toggle call, in order
    pub fn history(&self) -> Vec<bool> {
        self.state.lock().unwrap().history.clone()
    }

    /// Number of set/toggle calls observed
    pub fn transition_count(&self) -> usize {
        self.state.lock().unwrap().history.len()
    }
}
