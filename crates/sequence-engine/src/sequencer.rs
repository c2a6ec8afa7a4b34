//! Sequencer Context
//!
//! The single context object shared by every handler: phase flag, freeze
//! flag, analysis cursor, press counter, and the line under analysis.
//! Handlers return reports describing what the hardware side must do; they
//! never touch timers or pins themselves.

use crate::classify::{classify, DigitClass};
use crate::line::{LineBuffer, LINE_CAPACITY};
use crate::RESTART_MARKER;
use tracing::debug;

/// Sequencer phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Collecting a line of input
    Input,
    /// Periodically reinterpreting the completed line
    Analysis,
}

/// Indicator request produced by one classification step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorAction {
    /// Stop blinking and flip the indicator once
    ToggleOnce,
    /// Start continuous blinking
    StartBlink,
}

/// One classified digit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// The digit byte, for the status line
    pub digit: u8,
    /// Requested indicator action; `None` while frozen
    pub action: Option<IndicatorAction>,
    /// Freeze flag at classification time
    pub frozen: bool,
    /// The cursor reached the end of the line with this step
    pub finished: bool,
}

/// Outcome of one analysis timer expiry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not in the analysis phase; stale tick
    Idle,
    /// The cursor reached the end of the line without classifying
    Finished,
    /// A digit was classified
    Classified(TickReport),
}

/// Outcome of one button edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonReport {
    /// Cumulative press count, all phases
    pub count: u64,
    /// New freeze state, when the press landed during analysis
    pub froze: Option<bool>,
}

/// Shared sequencer state
pub struct SequencerCore {
    phase: Phase,
    frozen: bool,
    cursor: usize,
    line: LineBuffer,
    /// Restart markers that have already rewound this cycle
    restart_fired: [bool; LINE_CAPACITY],
    press_count: u64,
}

impl SequencerCore {
    /// Create a core in the input phase
    pub fn new() -> Self {
        Self {
            phase: Phase::Input,
            frozen: false,
            cursor: 0,
            line: LineBuffer::new(),
            restart_fired: [false; LINE_CAPACITY],
            press_count: 0,
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current freeze flag
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Cumulative button press count
    pub fn press_count(&self) -> u64 {
        self.press_count
    }

    /// The line under analysis
    pub fn line(&self) -> &LineBuffer {
        &self.line
    }

    /// Enter the analysis phase for a completed line.
    ///
    /// Returns `false` for an empty line: there is nothing to analyze and
    /// the phase stays `Input`.
    pub fn begin_analysis(&mut self, line: LineBuffer) -> bool {
        self.line = line;
        self.cursor = 0;
        self.frozen = false;
        self.restart_fired = [false; LINE_CAPACITY];

        if self.line.is_empty() {
            return false;
        }
        debug!(len = self.line.len(), "analysis started");
        self.phase = Phase::Analysis;
        true
    }

    /// Handle one analysis timer expiry.
    ///
    /// A restart marker rewinds the cursor to position 0 the first time it
    /// is reached in a cycle; afterwards the cursor passes over it. The
    /// rewind and the classification of the re-read digit happen within the
    /// same tick.
    pub fn analysis_tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Analysis {
            return TickOutcome::Idle;
        }

        let digit = loop {
            match self.line.byte_at(self.cursor) {
                None => {
                    self.cursor = self.line.len();
                    return TickOutcome::Finished;
                }
                Some(RESTART_MARKER) => {
                    if self.restart_fired[self.cursor] {
                        self.cursor += 1;
                    } else {
                        self.restart_fired[self.cursor] = true;
                        debug!(position = self.cursor, "restart marker rewinds analysis");
                        self.cursor = 0;
                    }
                }
                Some(byte) => break byte,
            }
        };

        let action = if self.frozen {
            None
        } else {
            Some(match classify(digit) {
                DigitClass::Odd => IndicatorAction::ToggleOnce,
                DigitClass::Even => IndicatorAction::StartBlink,
            })
        };

        self.cursor += 1;
        let finished = self.cursor >= self.line.len();

        TickOutcome::Classified(TickReport {
            digit,
            action,
            frozen: self.frozen,
            finished,
        })
    }

    /// Handle one button edge.
    ///
    /// The counter always advances; the freeze flag only flips during
    /// analysis.
    pub fn button_press(&mut self) -> ButtonReport {
        self.press_count += 1;
        let froze = if self.phase == Phase::Analysis {
            self.frozen = !self.frozen;
            Some(self.frozen)
        } else {
            None
        };
        ButtonReport {
            count: self.press_count,
            froze,
        }
    }

    /// Leave the analysis phase, completed or aborted
    pub fn exit_analysis(&mut self) {
        self.phase = Phase::Input;
        self.frozen = false;
        self.cursor = 0;
        self.line.clear();
    }
}

impl Default for SequencerCore {
    fn default() -> Self {
        Self::new()
    }
}
