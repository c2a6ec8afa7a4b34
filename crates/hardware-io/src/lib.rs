//! Hardware I/O Capabilities
//!
//! The control core never touches hardware directly; it depends on the
//! capability surface in this crate. Each collaborator (serial transport,
//! indicator output, button edge source, periodic timer) is exposed as a
//! small interface with a host implementation and a simulated double, so the
//! control loop runs identically against a real serial device, a terminal,
//! or a test harness.

#[cfg(unix)]
mod button;
mod error;
mod indicator;
mod pump;
mod serial;
mod sim;
mod timer;

#[cfg(unix)]
pub use button::spawn_button_source;
pub use error::TransportError;
pub use indicator::{Indicator, LogIndicator};
pub use pump::spawn_receive_pump;
pub use serial::{open_transport, BoxReader, BoxWriter, SerialSettings, SerialTx, STDIO_DEVICE};
pub use sim::{IndicatorProbe, SimIndicator};
pub use timer::{spawn_periodic, TimerHandle};
