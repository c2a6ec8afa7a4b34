//! Terminal Text Protocol
//!
//! Every human-readable line the sequencer emits on the serial link. The
//! wording is part of the external contract; tests match it literally.

use sequence_engine::{IndicatorAction, TickReport};

/// Prompt opening each input cycle (no line terminator)
pub const PROMPT: &str = "Input: ";

/// Warning emitted when a line completes by capacity exhaustion
pub const OVERFLOW_WARNING: &str = "Stop trying to overflow my buffer! I resent that!";

/// First line of the interruption notice
pub const INTERRUPTED_ELLIPSIS: &str = "...";

/// Second line of the interruption notice
pub const INTERRUPTED: &str = "(New input received)";

/// Emitted when the whole sequence has been analyzed
pub const COMPLETION: &str = "End of sequence. Waiting for new number...";

/// Status line for one classified digit
pub fn digit_status(report: &TickReport) -> String {
    let action = match report.action {
        Some(IndicatorAction::ToggleOnce) => "Toggle LED",
        Some(IndicatorAction::StartBlink) => "Blink LED",
        None => "Skipped LED action",
    };
    format!("Digit {} -> {}", report.digit as char, action)
}

/// Report line for one button press
pub fn button_line(count: u64) -> String {
    format!("Interrupt: Button pressed. LED locked. Count = {count}")
}
