//! Lock-Free Byte Queue
//!
//! Provides the bounded SPSC byte queue that carries received serial bytes
//! from the receive pump to the control loop.

mod queue;

pub use queue::{RxQueue, DEFAULT_CAPACITY};
