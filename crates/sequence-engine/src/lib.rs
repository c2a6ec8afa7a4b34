//! Sequence Engine
//!
//! Pure control-core state for the digit sequencer: the line buffer and
//! editor that assemble a digit sequence from raw bytes, the parity
//! classifier, and the [`SequencerCore`] context object that owns the phase
//! state machine, the analysis cursor, the freeze flag, and the press
//! counter. Handler methods return effect values; all I/O and timer control
//! stays with the caller, so every rule in this crate is testable without
//! hardware.

mod classify;
mod editor;
mod line;
mod sequencer;

pub use classify::{classify, DigitClass};
pub use sequencer::{ButtonReport, IndicatorAction, Phase, SequencerCore, TickOutcome, TickReport};
pub use editor::{FeedResult, LineEditor};
pub use line::{LineBuffer, LINE_CAPACITY};

/// Rewinds analysis to the first position of the line
pub const RESTART_MARKER: u8 = b'-';

/// Submits the line being edited
pub const SUBMIT_BYTE: u8 = b'\r';

/// Erases the last byte of the line being edited
pub const BACKSPACE_BYTE: u8 = 0x7F;
