//! Digit Sequencer Control Loop
//!
//! Binds the sequence engine to the hardware capabilities. The control
//! loop's only suspension point is a blocking receive on the event channel;
//! every wake drains the pending events and dispatches them in declared
//! priority order (button > received byte > analysis tick > blink tick), so
//! the ordering the original hardware got from interrupt priorities is
//! enforced structurally here.

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

pub mod app_config;
pub mod event;
pub mod protocol;
pub mod runtime;

pub use app_config::{AppConfig, TimingSettings};
pub use event::Event;
pub use runtime::{ControlError, Runtime};

/// Initialize logging.
///
/// Log lines go to stderr; stdout may be carrying the serial protocol when
/// the stdio transport is selected.
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
